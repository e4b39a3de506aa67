//! Lazily loaded page modules

mod accounts;
mod admin;
mod home;
mod panel;

use crate::config::AppConfig;
use gloo_timers::future::TimeoutFuture;
use portal_core::{CoreError, CoreResult, LazyModule, LoadStatus, Page};
use std::collections::HashMap;
use std::rc::Rc;
use yew::prelude::*;
use yew::suspense::{Suspension, SuspensionResult};

/// A loaded page: its title and how to render it
pub struct PageModule {
    pub page: Page,
    pub title: &'static str,
    pub render: fn() -> Html,
}

impl PartialEq for PageModule {
    fn eq(&self, other: &Self) -> bool {
        self.page == other.page
    }
}

fn page_module(page: Page) -> PageModule {
    match page {
        Page::Home => home::MODULE,
        Page::Login => accounts::LOGIN,
        Page::Register => accounts::REGISTER,
        Page::ResetPassword => accounts::RESET_PASSWORD,
        Page::Panel => panel::MODULE,
        Page::Admin => admin::MODULE,
    }
}

async fn load_page(page: Page) -> CoreResult<PageModule> {
    // Yield to the event loop so the navigation paints the placeholder first
    TimeoutFuture::new(0).await;
    Ok(page_module(page))
}

thread_local! {
    static MODULES: HashMap<Page, Rc<LazyModule<PageModule>>> = Page::ALL
        .into_iter()
        .map(|page| {
            let module = LazyModule::new(page.module_name(), move || load_page(page));
            (page, Rc::new(module))
        })
        .collect();
}

/// The lazy module backing a page
pub fn lazy_module(page: Page) -> Rc<LazyModule<PageModule>> {
    MODULES.with(|modules| Rc::clone(&modules[&page]))
}

/// Suspend until the page's module has loaded or failed
fn resolve_module(page: Page) -> SuspensionResult<Result<Rc<PageModule>, CoreError>> {
    let module = lazy_module(page);
    match module.status() {
        LoadStatus::Ready(loaded) => Ok(Ok(loaded)),
        LoadStatus::Failed(err) => Ok(Err(err)),
        LoadStatus::Idle | LoadStatus::Loading => {
            let pending = module.load();
            Err(Suspension::from_future(async move {
                let _ = pending.await;
            }))
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct LazyPageProps {
    pub page: Page,
}

/// Renders a page once its module is loaded, suspending until then
#[function_component(LazyPage)]
pub fn lazy_page(props: &LazyPageProps) -> HtmlResult {
    let refresh = use_force_update();
    let page = props.page;

    let view = match resolve_module(page)? {
        Ok(loaded) => html! { <LoadedPage module={loaded} /> },
        Err(err) => {
            let on_retry = Callback::from(move |_: MouseEvent| {
                let _ = lazy_module(page).load();
                refresh.force_update();
            });
            html! {
                <div class="text-center p-10">
                    <p class="text-red-600 mb-4">{"Nie udało się załadować strony."}</p>
                    <p class="text-gray-500 text-sm mb-4">{err.to_string()}</p>
                    <button class="px-4 py-2 bg-blue-600 text-white rounded-lg" onclick={on_retry}>
                        {"Spróbuj ponownie"}
                    </button>
                </div>
            }
        }
    };

    Ok(view)
}

#[derive(Properties, PartialEq)]
struct LoadedPageProps {
    module: Rc<PageModule>,
}

#[function_component(LoadedPage)]
fn loaded_page(props: &LoadedPageProps) -> Html {
    use_effect_with(props.module.title, |title| {
        gloo::utils::document().set_title(&AppConfig::page_title(title));
    });

    (props.module.render)()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_page_has_a_module() {
        for page in Page::ALL {
            let module = page_module(page);
            assert_eq!(module.page, page);
            assert!(!module.title.is_empty());
        }
    }

    #[test]
    fn test_registry_returns_same_module() {
        let first = lazy_module(Page::Admin);
        let second = lazy_module(Page::Admin);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "admin/home");
    }
}
