//! User panel

use super::PageModule;
use crate::components::LogoutButton;
use crate::session::use_session;
use portal_core::Page;
use yew::prelude::*;

pub const MODULE: PageModule = PageModule {
    page: Page::Panel,
    title: "Moje konto",
    render: view,
};

fn view() -> Html {
    html! { <Panel /> }
}

#[function_component(Panel)]
fn panel() -> Html {
    let session = use_session();
    let minutes_left = session
        .remaining()
        .map(|remaining| remaining.num_minutes().max(0));

    html! {
        <section class="max-w-2xl mx-auto p-10">
            <h1 class="text-2xl font-bold mb-6">{"Moje konto"}</h1>
            if let Some(minutes) = minutes_left {
                <p class="mb-6 text-gray-600">
                    {format!("Sesja wygaśnie za {minutes} min.")}
                </p>
            }
            <LogoutButton />
        </section>
    }
}
