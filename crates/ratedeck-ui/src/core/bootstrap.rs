//! Startup sequencing for the browser application.
//!
//! # Design
//! - Startup is a typed chain: stylesheets, then the root application, then
//!   plugins, then mount. Each stage consumes the previous one, so plugins
//!   cannot be registered after mount and mount happens at most once per chain.
//! - The document is reached through [`DocumentHost`]; the browser
//!   implementation lives behind `wasm32` and tests use an in-memory host.
//! - A mount target already carrying an application is rejected instead of
//!   receiving a second instance.

use std::fmt::{self, Display, Formatter};

use crate::core::toast::ToastConfig;

/// Selector of the element the application mounts into.
pub const MOUNT_SELECTOR: &str = "#app";

/// A stylesheet injected into the document head before the application starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stylesheet {
    /// Stable identifier, used to avoid injecting the same sheet twice.
    pub id: &'static str,
    /// URL of the sheet.
    pub href: &'static str,
}

/// Global application styles.
pub const GLOBAL_STYLES: Stylesheet = Stylesheet {
    id: "ratedeck-global",
    href: "static/style.css",
};

/// Icon font used by the currency selector and toasts.
pub const ICON_FONT: Stylesheet = Stylesheet {
    id: "font-awesome",
    href: "https://cdn.jsdelivr.net/npm/font-awesome@4.7.0/css/font-awesome.min.css",
};

/// Styles for the toast container.
pub const TOAST_STYLES: Stylesheet = Stylesheet {
    id: "ratedeck-toast",
    href: "static/toast.css",
};

/// Fatal startup failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartupError {
    /// No browser document was available.
    DocumentUnavailable,
    /// A stylesheet could not be attached to the document head.
    StyleInjection {
        /// Sheet that failed.
        href: &'static str,
        /// Host-provided reason.
        reason: String,
    },
    /// The mount selector is not an id selector.
    InvalidSelector {
        /// Offending selector.
        selector: String,
    },
    /// No element matched the mount selector.
    MountTargetMissing {
        /// Selector that matched nothing.
        selector: String,
    },
    /// The mount target already hosts an application instance.
    AlreadyMounted {
        /// Selector of the occupied target.
        selector: String,
    },
    /// The mount target could not be marked as occupied.
    MountMark {
        /// Selector of the target.
        selector: String,
        /// Host-provided reason.
        reason: String,
    },
}

impl Display for StartupError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentUnavailable => formatter.write_str("browser document unavailable"),
            Self::StyleInjection { href, reason } => {
                write!(formatter, "failed to inject stylesheet {href}: {reason}")
            }
            Self::InvalidSelector { selector } => {
                write!(formatter, "mount selector {selector:?} must be an id selector")
            }
            Self::MountTargetMissing { selector } => {
                write!(formatter, "mount target {selector} not found")
            }
            Self::AlreadyMounted { selector } => {
                write!(formatter, "an application is already mounted at {selector}")
            }
            Self::MountMark { selector, reason } => {
                write!(formatter, "failed to mark mount target {selector}: {reason}")
            }
        }
    }
}

impl std::error::Error for StartupError {}

/// Document operations needed during startup.
pub trait DocumentHost {
    /// Element handle produced by the host.
    type Element;

    /// Attach `sheet` to the document head.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the sheet cannot be attached.
    fn inject_stylesheet(&mut self, sheet: &Stylesheet) -> Result<(), String>;

    /// Element with the given id, if present.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Whether `element` already hosts an application.
    fn is_mounted(&self, element: &Self::Element) -> bool;

    /// Mark `element` as hosting an application.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the marker cannot be recorded.
    fn mark_mounted(&mut self, element: &Self::Element) -> Result<(), String>;
}

/// Root component rendered into the mount target.
pub trait RootApp<E> {
    /// Properties assembled by plugins before mount.
    type Props: Default;
    /// Handle returned once rendering has started.
    type Handle;

    /// Render into `root` with `props`.
    fn render(root: E, props: Self::Props) -> Self::Handle;
}

/// Application-wide extension registered between construction and mount.
pub trait Plugin<P> {
    /// Name recorded in the startup trace.
    fn name(&self) -> &'static str;

    /// Install the plugin into the root properties.
    fn install(self, props: &mut P);
}

/// Root properties able to carry a toast configuration.
pub trait ToastSlot {
    /// Store the configuration used by the toast provider.
    fn set_toast_config(&mut self, config: ToastConfig);
}

/// Registers toast notifications application-wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastPlugin {
    config: ToastConfig,
}

impl ToastPlugin {
    /// Plugin carrying `config`.
    #[must_use]
    pub const fn new(config: ToastConfig) -> Self {
        Self { config }
    }
}

impl<P: ToastSlot> Plugin<P> for ToastPlugin {
    fn name(&self) -> &'static str {
        "toast"
    }

    fn install(self, props: &mut P) {
        props.set_toast_config(self.config);
    }
}

/// Completed startup step, in execution order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartupStep {
    /// A stylesheet was attached.
    Stylesheet(&'static str),
    /// The root application was constructed.
    Construct,
    /// A plugin was installed.
    Plugin(&'static str),
    /// The application was mounted at the selector.
    Mount(String),
}

/// First stage: document prepared with stylesheets.
pub struct Bootstrap<H> {
    host: H,
    steps: Vec<StartupStep>,
}

impl<H: DocumentHost> Bootstrap<H> {
    /// Start a chain against `host`.
    #[must_use]
    pub const fn new(host: H) -> Self {
        Self {
            host,
            steps: Vec::new(),
        }
    }

    /// Attach a stylesheet.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::StyleInjection`] when the host refuses the sheet.
    pub fn stylesheet(mut self, sheet: &Stylesheet) -> Result<Self, StartupError> {
        self.host
            .inject_stylesheet(sheet)
            .map_err(|reason| StartupError::StyleInjection {
                href: sheet.href,
                reason,
            })?;
        self.steps.push(StartupStep::Stylesheet(sheet.id));
        Ok(self)
    }

    /// Construct the root application.
    #[must_use]
    pub fn app<R: RootApp<H::Element>>(mut self) -> AppBuilder<H, R> {
        self.steps.push(StartupStep::Construct);
        AppBuilder {
            host: self.host,
            props: R::Props::default(),
            steps: self.steps,
        }
    }
}

/// Second stage: application constructed, accepting plugins.
pub struct AppBuilder<H: DocumentHost, R: RootApp<H::Element>> {
    host: H,
    props: R::Props,
    steps: Vec<StartupStep>,
}

impl<H: DocumentHost, R: RootApp<H::Element>> AppBuilder<H, R> {
    /// Install a plugin into the root properties.
    #[must_use]
    pub fn plugin<P: Plugin<R::Props>>(mut self, plugin: P) -> Self {
        self.steps.push(StartupStep::Plugin(plugin.name()));
        plugin.install(&mut self.props);
        self
    }

    /// Render the application into the element matching `selector`.
    ///
    /// Nothing is rendered when the target is missing or already occupied.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::InvalidSelector`], [`StartupError::MountTargetMissing`],
    /// [`StartupError::AlreadyMounted`] or [`StartupError::MountMark`].
    pub fn mount(mut self, selector: &str) -> Result<Mounted<H, R::Handle>, StartupError> {
        let id = selector_id(selector)?;
        let root = self
            .host
            .element_by_id(id)
            .ok_or_else(|| StartupError::MountTargetMissing {
                selector: selector.to_string(),
            })?;
        if self.host.is_mounted(&root) {
            return Err(StartupError::AlreadyMounted {
                selector: selector.to_string(),
            });
        }
        self.host
            .mark_mounted(&root)
            .map_err(|reason| StartupError::MountMark {
                selector: selector.to_string(),
                reason,
            })?;
        let handle = R::render(root, self.props);
        self.steps.push(StartupStep::Mount(selector.to_string()));
        Ok(Mounted {
            host: self.host,
            handle,
            steps: self.steps,
        })
    }
}

/// Final stage: a running application.
pub struct Mounted<H, A> {
    /// Document host after startup.
    pub host: H,
    /// Handle returned by the root renderer.
    pub handle: A,
    /// Steps performed, in order.
    pub steps: Vec<StartupStep>,
}

fn selector_id(selector: &str) -> Result<&str, StartupError> {
    selector
        .strip_prefix('#')
        .filter(|id| {
            !id.is_empty()
                && id
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        })
        .ok_or_else(|| StartupError::InvalidSelector {
            selector: selector.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::toast::APP_TOAST_CONFIG;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Default)]
    struct Document {
        ids: HashSet<String>,
        head: Vec<&'static str>,
        mounted: HashSet<String>,
        rendered: Vec<(String, Option<ToastConfig>)>,
        refuse_styles: bool,
        refuse_marks: bool,
    }

    #[derive(Clone, Default)]
    struct FakeHost(Rc<RefCell<Document>>);

    impl FakeHost {
        fn with_ids(ids: &[&str]) -> Self {
            let host = Self::default();
            host.0
                .borrow_mut()
                .ids
                .extend(ids.iter().map(|id| (*id).to_string()));
            host
        }
    }

    impl DocumentHost for FakeHost {
        type Element = (String, Rc<RefCell<Document>>);

        fn inject_stylesheet(&mut self, sheet: &Stylesheet) -> Result<(), String> {
            let mut document = self.0.borrow_mut();
            if document.refuse_styles {
                return Err("head missing".to_string());
            }
            document.head.push(sheet.id);
            Ok(())
        }

        fn element_by_id(&self, id: &str) -> Option<Self::Element> {
            self.0
                .borrow()
                .ids
                .contains(id)
                .then(|| (id.to_string(), Rc::clone(&self.0)))
        }

        fn is_mounted(&self, element: &Self::Element) -> bool {
            self.0.borrow().mounted.contains(&element.0)
        }

        fn mark_mounted(&mut self, element: &Self::Element) -> Result<(), String> {
            let mut document = self.0.borrow_mut();
            if document.refuse_marks {
                return Err("attribute rejected".to_string());
            }
            document.mounted.insert(element.0.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Props {
        toast: Option<ToastConfig>,
    }

    impl ToastSlot for Props {
        fn set_toast_config(&mut self, config: ToastConfig) {
            self.toast = Some(config);
        }
    }

    struct Root;

    impl RootApp<(String, Rc<RefCell<Document>>)> for Root {
        type Props = Props;
        type Handle = ();

        fn render((id, document): (String, Rc<RefCell<Document>>), props: Props) {
            document.borrow_mut().rendered.push((id, props.toast));
        }
    }

    fn start(host: FakeHost) -> Result<Mounted<FakeHost, ()>, StartupError> {
        Bootstrap::new(host)
            .stylesheet(&GLOBAL_STYLES)?
            .stylesheet(&ICON_FONT)?
            .app::<Root>()
            .plugin(ToastPlugin::new(APP_TOAST_CONFIG))
            .mount(MOUNT_SELECTOR)
    }

    #[test]
    fn steps_run_in_declared_order() -> Result<(), Box<dyn std::error::Error>> {
        let host = FakeHost::with_ids(&["app"]);
        let mounted = start(host.clone())?;

        assert_eq!(
            mounted.steps,
            vec![
                StartupStep::Stylesheet("ratedeck-global"),
                StartupStep::Stylesheet("font-awesome"),
                StartupStep::Construct,
                StartupStep::Plugin("toast"),
                StartupStep::Mount("#app".to_string()),
            ]
        );
        assert_eq!(host.0.borrow().head, ["ratedeck-global", "font-awesome"]);
        Ok(())
    }

    #[test]
    fn mounts_one_instance_with_toast_config() -> Result<(), Box<dyn std::error::Error>> {
        let host = FakeHost::with_ids(&["app", "other"]);
        start(host.clone())?;

        let document = host.0.borrow();
        assert_eq!(document.rendered.len(), 1);
        let (id, toast) = &document.rendered[0];
        assert_eq!(id, "app");
        let toast = toast.ok_or("toast plugin not installed")?;
        assert_eq!(toast.limit(), 2);
        assert_eq!(toast.auto_close().millis(), Some(3000));
        Ok(())
    }

    #[test]
    fn missing_target_renders_nothing() {
        let host = FakeHost::with_ids(&["root"]);
        let result = start(host.clone());

        assert!(matches!(
            result,
            Err(StartupError::MountTargetMissing { ref selector }) if selector == "#app"
        ));
        let document = host.0.borrow();
        assert!(document.rendered.is_empty());
        assert!(document.mounted.is_empty());
    }

    #[test]
    fn second_bootstrap_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let host = FakeHost::with_ids(&["app"]);
        start(host.clone())?;
        let second = start(host.clone());

        assert!(matches!(second, Err(StartupError::AlreadyMounted { .. })));
        assert_eq!(host.0.borrow().rendered.len(), 1);
        Ok(())
    }

    #[test]
    fn style_failure_stops_before_construction() {
        let host = FakeHost::with_ids(&["app"]);
        host.0.borrow_mut().refuse_styles = true;
        let result = start(host.clone());

        assert!(matches!(
            result,
            Err(StartupError::StyleInjection { href: "static/style.css", .. })
        ));
        assert!(host.0.borrow().rendered.is_empty());
    }

    #[test]
    fn unmarkable_target_is_not_rendered() {
        let host = FakeHost::with_ids(&["app"]);
        host.0.borrow_mut().refuse_marks = true;
        let result = start(host.clone());

        assert!(matches!(
            result,
            Err(StartupError::MountMark { ref selector, .. }) if selector == "#app"
        ));
        let document = host.0.borrow();
        assert!(document.rendered.is_empty());
        assert!(document.mounted.is_empty());
    }

    #[test]
    fn only_id_selectors_are_accepted() {
        for selector in ["app", ".app", "#", "#app div"] {
            let result = Bootstrap::new(FakeHost::with_ids(&["app"]))
                .app::<Root>()
                .mount(selector);
            assert!(
                matches!(result, Err(StartupError::InvalidSelector { .. })),
                "{selector} should be rejected"
            );
        }
    }

    #[test]
    fn startup_errors_render_context() {
        let err = StartupError::MountTargetMissing {
            selector: "#app".to_string(),
        };
        assert_eq!(err.to_string(), "mount target #app not found");
    }
}
