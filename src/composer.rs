use crate::controller::Controller;
use leptos::leptos_dom::ev::SubmitEvent;
use leptos::*;

#[component]
pub fn Composer<T, U>(controller: RwSignal<Controller>, on_submit: T, on_delete: U) -> impl IntoView
where
    T: Fn() + 'static + Clone,
    U: Fn() + 'static + Clone,
{
    let update_input = move |ev| {
        let v = event_target_value(&ev);
        controller.update(|c| c.set_input(v));
    };
    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        on_submit();
    };
    let cancel = move |_| {
        controller.update(|c| {
            if let Some(id) = c.selection() {
                c.toggle(id);
            }
        });
    };
    let disabled = move || controller.with(|c| !(c.can_send() || c.can_update()));
    let label = move || {
        controller.with(|c| {
            if c.is_sending() {
                "Sending..."
            } else if c.selection().is_some() {
                "Update"
            } else {
                "Send"
            }
        })
    };

    view! {
        <form class="w-full flex flex-col gap-2" on:submit=submit>
            <label for="message" class="sr-only">
                Your message
            </label>
            <textarea
                id="message"
                rows="3"
                class="block p-2.5 w-full text-sm text-gray-900 bg-white rounded-lg border border-gray-300 focus:ring-blue-500 focus:border-blue-500 dark:bg-gray-800 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white resize-none"
                placeholder="Write your message here..."
                on:input=update_input
                prop:value=move || controller.with(|c| c.input().to_owned())
            />
            <div class="flex flex-row gap-2">
                <button
                    type="submit"
                    class="text-white bg-blue-700 hover:bg-blue-800 font-medium rounded-lg text-sm px-5 py-2.5 disabled:cursor-not-allowed disabled:opacity-50"
                    class:animate-pulse=move || controller.with(Controller::is_sending)
                    disabled=disabled
                >
                    {label}
                </button>
                <Show when=move || controller.with(Controller::can_delete)>
                    <button
                        type="button"
                        class="text-white bg-red-700 hover:bg-red-800 font-medium rounded-lg text-sm px-5 py-2.5"
                        on:click={
                            let on_delete = on_delete.clone();
                            move |_| on_delete()
                        }
                    >
                        Delete
                    </button>
                    <button
                        type="button"
                        class="text-gray-900 bg-white border border-gray-300 hover:bg-gray-100 font-medium rounded-lg text-sm px-5 py-2.5 dark:bg-gray-800 dark:text-white dark:border-gray-600"
                        on:click=cancel
                        disabled=move || controller.with(Controller::is_sending)
                    >
                        Cancel
                    </button>
                </Show>
            </div>
        </form>
    }
}
