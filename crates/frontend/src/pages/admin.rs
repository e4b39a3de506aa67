//! Admin panel

use super::PageModule;
use crate::components::LogoutButton;
use portal_core::Page;
use yew::prelude::*;

pub const MODULE: PageModule = PageModule {
    page: Page::Admin,
    title: "Panel administratora",
    render: view,
};

fn view() -> Html {
    html! {
        <section class="max-w-2xl mx-auto p-10">
            <h1 class="text-2xl font-bold mb-6">{"Panel administratora"}</h1>
            <LogoutButton />
        </section>
    }
}
