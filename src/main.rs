mod api;
mod app;
mod composer;
mod config;
mod controller;
mod header;
mod loading;
mod message;
mod mock;
mod state;

use app::*;
use leptos::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(|| {
        view! { <App /> }
    })
}
