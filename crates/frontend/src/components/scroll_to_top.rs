use yew::prelude::*;
use yew_router::prelude::*;

/// Scrolls the window back to the top whenever the path changes
#[function_component(ScrollToTop)]
pub fn scroll_to_top() -> Html {
    let path = use_location().map(|location| location.path().to_string());

    use_effect_with(path, |_| {
        gloo::utils::window().scroll_to_with_x_and_y(0.0, 0.0);
    });

    Html::default()
}
