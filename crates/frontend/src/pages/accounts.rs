//! Account pages: login, registration and password reminder

use super::PageModule;
use crate::router::AppRoute;
use crate::session::use_session;
use portal_core::Page;
use yew::prelude::*;
use yew_router::prelude::*;

pub const LOGIN: PageModule = PageModule {
    page: Page::Login,
    title: "Zaloguj się",
    render: login_view,
};

pub const REGISTER: PageModule = PageModule {
    page: Page::Register,
    title: "Zarejestruj się",
    render: register_view,
};

pub const RESET_PASSWORD: PageModule = PageModule {
    page: Page::ResetPassword,
    title: "Przypomnij hasło",
    render: reset_password_view,
};

fn login_view() -> Html {
    html! { <Login /> }
}

fn register_view() -> Html {
    html! { <Register /> }
}

fn reset_password_view() -> Html {
    html! { <ResetPassword /> }
}

/// Accepts a token issued elsewhere and starts a session with it
#[function_component(Login)]
fn login() -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let token = use_state(String::new);

    let on_token_input = {
        let token = token.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            token.set(input.value());
        })
    };

    let on_submit = {
        let token = token.clone();
        let session = session.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let value = token.trim();
            if value.is_empty() {
                return;
            }
            session.login_with_default_lifetime(value);
            if let Some(navigator) = &navigator {
                navigator.push(&AppRoute::Panel);
            }
        })
    };

    html! {
        <section class="max-w-md mx-auto p-10">
            <h1 class="text-2xl font-bold mb-6">{"Zaloguj się"}</h1>
            if session.is_logged_in() {
                <p class="mb-4 text-gray-600">{"Jesteś już zalogowany."}</p>
            }
            <form onsubmit={on_submit}>
                <label class="block text-sm font-medium mb-2">{"Token"}</label>
                <input
                    type="password"
                    class="w-full px-4 py-2 border rounded-lg mb-4"
                    value={(*token).clone()}
                    oninput={on_token_input}
                    required=true
                />
                <button
                    type="submit"
                    disabled={token.trim().is_empty()}
                    class="w-full px-4 py-3 bg-blue-600 text-white rounded-lg disabled:opacity-50"
                >
                    {"Zaloguj"}
                </button>
            </form>
            <nav class="flex justify-between mt-6 text-sm">
                <Link<AppRoute> to={AppRoute::Register} classes="text-blue-600">{"Nie masz konta?"}</Link<AppRoute>>
                <Link<AppRoute> to={AppRoute::ResetPassword} classes="text-blue-600">{"Nie pamiętasz hasła?"}</Link<AppRoute>>
            </nav>
        </section>
    }
}

#[function_component(Register)]
fn register() -> Html {
    html! {
        <section class="max-w-md mx-auto p-10">
            <h1 class="text-2xl font-bold mb-6">{"Zarejestruj się"}</h1>
            <Link<AppRoute> to={AppRoute::Login} classes="text-blue-600">{"Masz już konto? Zaloguj się"}</Link<AppRoute>>
        </section>
    }
}

#[function_component(ResetPassword)]
fn reset_password() -> Html {
    html! {
        <section class="max-w-md mx-auto p-10">
            <h1 class="text-2xl font-bold mb-6">{"Przypomnij hasło"}</h1>
            <Link<AppRoute> to={AppRoute::Login} classes="text-blue-600">{"Wróć do logowania"}</Link<AppRoute>>
        </section>
    }
}
