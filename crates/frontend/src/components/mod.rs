mod logout_button;
mod scroll_to_top;
mod spinner;

pub use logout_button::LogoutButton;
pub use scroll_to_top::ScrollToTop;
pub use spinner::LoadingSpinner as Spinner;
