use crate::api::{Call, Client};
use crate::composer::Composer;
use crate::config::Config;
use crate::controller::Controller;
use crate::header::Header;
use crate::message::Message;
use leptos::logging::{log, warn};
use leptos::*;

fn load(client: StoredValue<Client>, controller: RwSignal<Controller>) {
    let Some(call) = controller.try_update(Controller::begin_load) else {
        return;
    };
    spawn_local(async move {
        let result = client.get_value().call(&call).await;
        controller.update(|c| c.finish_load(result));
    });
}

fn submit(client: StoredValue<Client>, controller: RwSignal<Controller>) {
    let call = controller
        .try_update(|c| c.begin_send().or_else(|| c.begin_update()))
        .flatten();
    let Some(call) = call else {
        return;
    };
    spawn_local(async move {
        let client = client.get_value();
        match &call {
            Call::CreateMessage { .. } => {
                let result = client.call(&call).await;
                controller.update(|c| c.finish_send(result));
            }
            Call::UpdateMessage { .. } => {
                let result = client.call(&call).await;
                controller.update(|c| c.finish_update(result));
            }
            call => warn!("Unexpected submit {call:?}"),
        }
    });
}

fn delete(client: StoredValue<Client>, controller: RwSignal<Controller>) {
    let Some(call @ Call::DeleteMessage { id }) = controller.with_untracked(Controller::begin_delete)
    else {
        return;
    };
    spawn_local(async move {
        let result = client.get_value().call(&call).await;
        controller.update(|c| c.finish_delete(id, result));
    });
}

#[component]
pub fn App() -> impl IntoView {
    let config = Config::from_location();
    log!("Starting with {config:?}");
    let client = store_value(Client::new(config));
    let controller = create_rw_signal(Controller::default());

    load(client, controller);

    let on_submit = move || submit(client, controller);
    let on_delete = move || delete(client, controller);

    view! {
        <div class="flex flex-col min-h-dvh dark:text-white">
            <Header controller />
            <main class="grow flex flex-col w-full max-w-2xl mx-auto">
                <section class="m-4">
                    <h2 class="text-lg font-semibold mb-2">Send a message</h2>
                    <Composer controller on_submit on_delete />
                </section>
                <ul class="m-4 space-y-2">
                    <For
                        each=move || controller.with(|c| c.messages().to_vec())
                        key=|message| (message.id, message.updated_at)
                        children=move |message| {
                            view! { <Message message controller /> }
                        }
                    />
                </ul>
            </main>
        </div>
    }
}
