use crate::session::use_session;
use yew::prelude::*;

/// Ends the session. Session-only routes redirect on their own once the
/// context updates.
#[function_component(LogoutButton)]
pub fn logout_button() -> Html {
    let session = use_session();
    let onclick = Callback::from(move |_: MouseEvent| session.logout());

    html! {
        <button
            class="px-4 py-2 bg-gray-200 hover:bg-gray-300 rounded-lg"
            {onclick}
        >
            {"Wyloguj się"}
        </button>
    }
}
