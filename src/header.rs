use crate::controller::Controller;
use crate::loading::Loading;
use leptos::*;

#[component]
pub fn Header(controller: RwSignal<Controller>) -> impl IntoView {
    view! {
        <header class="flex flex-row items-center justify-between p-4 border-b-2 dark:border-gray-800">
            <h1 class="text-xl font-semibold text-gray-900 dark:text-white">Mock Service Worker</h1>
            {move || {
                if controller.with(Controller::loading_user) {
                    view! { <Loading text="Loading user..." /> }.into_view()
                } else {
                    controller
                        .with(|c| c.user().cloned())
                        .map(|user| {
                            view! {
                                <div class="flex flex-row items-center gap-2">
                                    <div class="w-10 h-10 rounded-full bg-blue-600 text-white flex items-center justify-center font-semibold">
                                        {user.initial()}
                                    </div>
                                    <span class="text-sm font-semibold text-gray-700 dark:text-gray-300">
                                        {user.name}
                                    </span>
                                </div>
                            }
                        })
                        .into_view()
                }
            }}
        </header>
    }
}
