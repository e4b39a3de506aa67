//! Home page

use super::PageModule;
use crate::router::AppRoute;
use crate::session::use_is_logged_in;
use portal_core::Page;
use yew::prelude::*;
use yew_router::prelude::*;

pub const MODULE: PageModule = PageModule {
    page: Page::Home,
    title: "Strona główna",
    render: view,
};

fn view() -> Html {
    html! { <Home /> }
}

#[function_component(Home)]
fn home() -> Html {
    let is_logged_in = use_is_logged_in();

    html! {
        <section class="max-w-2xl mx-auto p-10 text-center">
            <h1 class="text-3xl font-bold mb-6">{"Witaj"}</h1>
            if is_logged_in {
                <Link<AppRoute> to={AppRoute::Panel} classes="text-blue-600">
                    {"Przejdź do swojego konta"}
                </Link<AppRoute>>
            } else {
                <nav class="flex justify-center gap-6">
                    <Link<AppRoute> to={AppRoute::Login} classes="text-blue-600">{"Zaloguj się"}</Link<AppRoute>>
                    <Link<AppRoute> to={AppRoute::Register} classes="text-blue-600">{"Zarejestruj się"}</Link<AppRoute>>
                </nav>
            }
        </section>
    }
}
