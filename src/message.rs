use crate::controller::Controller;
use crate::state::Message as Msg;
use chrono::{DateTime, Local, Utc};
use leptos::IntoView;
use leptos::*;
use pulldown_cmark::{html, CowStr, Event, Parser, Tag};
use url::Url;

/// Links may only point to the web, to mail, or relative to the page.
fn safe_url(dest: &str) -> bool {
    match Url::parse(dest) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "mailto"),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

fn neutralize(dest_url: CowStr<'_>) -> CowStr<'_> {
    if safe_url(&dest_url) {
        dest_url
    } else {
        CowStr::Borrowed("#")
    }
}

/// Renders message content as Markdown. Raw HTML in the source is shown as
/// text and link targets outside http, https and mailto become `#`, so
/// nothing is injected.
pub fn render(content: &str) -> String {
    let parser = Parser::new(content).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: neutralize(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: neutralize(dest_url),
            title,
            id,
        }),
        event => event,
    });
    let mut parsed = String::new();
    html::push_html(&mut parsed, parser);
    parsed
}

fn time(date: DateTime<Utc>) -> String {
    format!("{}", DateTime::<Local>::from(date).format("%H:%M:%S"))
}

#[component]
pub fn Message(message: Msg, controller: RwSignal<Controller>) -> impl IntoView {
    let id = message.id;
    let parsed = render(&message.content);
    let created = time(message.created_at);
    let edited = message.updated_at.map(time);
    let selected = move || controller.with(|c| c.selection() == Some(id));
    let select = move |_| controller.update(|c| c.toggle(id));

    view! {
        <li
            class="flex flex-col gap-1 p-4 rounded-xl cursor-pointer bg-gray-100 dark:bg-gray-700 hover:bg-gray-200 dark:hover:bg-gray-600"
            class:ring-2=selected
            class:ring-blue-500=selected
            on:click=select
        >
            <div class="flex items-center space-x-2 rtl:space-x-reverse">
                <span class="text-sm font-semibold text-gray-900 dark:text-white">
                    {format!("#{id}")}
                </span>
                <span class="text-sm font-normal text-gray-500 dark:text-gray-400">
                    {created}
                </span>
                {edited
                    .map(|edited| {
                        view! {
                            <span class="text-sm italic text-gray-500 dark:text-gray-400">
                                {format!("edited {edited}")}
                            </span>
                        }
                    })}
            </div>
            <div class="text-sm font-normal text-gray-900 dark:text-white" inner_html=parsed />
        </li>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown() {
        assert_eq!(render("hello world"), "<p>hello world</p>\n");

        let html = render("Compile with `rustc`:\n\n```bash\nrustc main.rs\n```");
        assert!(html.contains("<code>rustc</code>"));
        assert!(html.contains("<pre><code class=\"language-bash\">rustc main.rs\n</code></pre>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render("hi <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));

        let html = render("<div onclick=\"x()\">block</div>");
        assert!(!html.contains("<div"));
    }

    #[test]
    fn test_script_links_are_dropped() {
        let html = render("[click](javascript:alert(document.cookie)) <javascript:alert(1)>");
        assert!(!html.contains("href=\"javascript"));
        assert!(html.contains("<a href=\"#\">click</a>"));

        let html = render("![x](data:text/html,boom) [v](vbscript:x)");
        assert!(!html.contains("data:text"));
        assert!(!html.contains("vbscript"));
        assert!(html.contains("src=\"#\""));
    }

    #[test]
    fn test_safe_links_are_kept() {
        let html = render("[a](https://example.com) [b](mailto:me@example.com) [c](/messages/1)");
        assert!(html.contains("href=\"https://example.com\""));
        assert!(html.contains("href=\"mailto:me@example.com\""));
        assert!(html.contains("href=\"/messages/1\""));
    }
}
