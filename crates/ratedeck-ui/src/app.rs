//! Root component and browser entrypoint.

use crate::components::rates::RatesPanel;
use crate::components::toast::ToastProvider;
use crate::core::bootstrap::{
    Bootstrap, GLOBAL_STYLES, ICON_FONT, MOUNT_SELECTOR, RootApp, StartupError, TOAST_STYLES,
    ToastPlugin, ToastSlot,
};
use crate::core::toast::{APP_TOAST_CONFIG, ToastConfig};
use crate::dom::WebDocument;
use crate::services::api::ApiClient;
use gloo::console;
use web_sys::Element;
use yew::prelude::*;

#[derive(Properties, PartialEq, Default)]
pub(crate) struct RootProps {
    #[prop_or_default]
    pub toast: Option<ToastConfig>,
}

impl ToastSlot for RootProps {
    fn set_toast_config(&mut self, config: ToastConfig) {
        self.toast = Some(config);
    }
}

#[function_component(RatedeckApp)]
pub(crate) fn ratedeck_app(props: &RootProps) -> Html {
    let client = use_memo(|_| ApiClient::from_document(), ());
    let panel = html! { <RatesPanel client={(*client).clone()} /> };
    match props.toast {
        Some(config) => html! { <ToastProvider {config}>{panel}</ToastProvider> },
        None => panel,
    }
}

pub(crate) struct YewRoot;

impl RootApp<Element> for YewRoot {
    type Props = RootProps;
    type Handle = yew::AppHandle<RatedeckApp>;

    fn render(root: Element, props: RootProps) -> Self::Handle {
        yew::Renderer::<RatedeckApp>::with_root_and_props(root, props).render()
    }
}

/// Entrypoint invoked by Trunk for wasm32 builds.
///
/// # Errors
///
/// Returns a [`StartupError`] when the document is unavailable, a stylesheet
/// cannot be attached, or `#app` is missing or already hosts the application.
pub fn run_app() -> Result<(), StartupError> {
    console_error_panic_hook::set_once();
    let mounted = Bootstrap::new(WebDocument::current()?)
        .stylesheet(&GLOBAL_STYLES)?
        .stylesheet(&ICON_FONT)?
        .stylesheet(&TOAST_STYLES)?
        .app::<YewRoot>()
        .plugin(ToastPlugin::new(APP_TOAST_CONFIG))
        .mount(MOUNT_SELECTOR)?;
    console::debug!(format!("ratedeck mounted: {:?}", mounted.steps));
    Ok(())
}
