use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::core::toast::{
    Toast, ToastConfig, ToastId, ToastKind, ToastOptions, ToastQueue, plan_timers,
};
use gloo::timers::callback::Timeout;
use yew::prelude::*;

pub(crate) enum ToastAction {
    Show {
        message: String,
        kind: ToastKind,
        options: ToastOptions,
    },
    Dismiss(ToastId),
}

impl Reducible for ToastQueue {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ToastAction::Show {
                message,
                kind,
                options,
            } => {
                next.push(message, kind, options);
            }
            ToastAction::Dismiss(id) => {
                if !next.dismiss(id) {
                    return self;
                }
            }
        }
        Rc::new(next)
    }
}

/// Handle exposed through context for raising toasts from any component.
#[derive(Clone, PartialEq)]
pub(crate) struct ToastHandle {
    dispatcher: UseReducerDispatcher<ToastQueue>,
}

impl ToastHandle {
    pub(crate) fn show(&self, message: impl Into<String>, kind: ToastKind) {
        self.dispatcher.dispatch(ToastAction::Show {
            message: message.into(),
            kind,
            options: ToastOptions::default(),
        });
    }

    pub(crate) fn error(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }
}

/// Toast handle when the toast plugin is installed.
#[hook]
pub(crate) fn use_toast() -> Option<ToastHandle> {
    use_context::<ToastHandle>()
}

#[derive(Properties, PartialEq)]
pub(crate) struct ToastProviderProps {
    pub config: ToastConfig,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(ToastProvider)]
pub(crate) fn toast_provider(props: &ToastProviderProps) -> Html {
    let config = props.config;
    let queue = use_reducer(move || ToastQueue::new(config));
    let handle = ToastHandle {
        dispatcher: queue.dispatcher(),
    };
    let on_dismiss = {
        let dispatcher = queue.dispatcher();
        Callback::from(move |id: ToastId| dispatcher.dispatch(ToastAction::Dismiss(id)))
    };

    html! {
        <ContextProvider<ToastHandle> context={handle}>
            {props.children.clone()}
            <ToastHost toasts={queue.visible().to_vec()} {on_dismiss} />
        </ContextProvider<ToastHandle>>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ToastHostProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<ToastId>,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component(ToastHost)]
pub(crate) fn toast_host(props: &ToastHostProps) -> Html {
    let timers = use_mut_ref(HashMap::<ToastId, Timeout>::new);
    {
        let timers = timers.clone();
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with_deps(
            move |list: &Vec<Toast>| {
                let mut running = timers.borrow_mut();
                let scheduled: HashSet<ToastId> = running.keys().copied().collect();
                let plan = plan_timers(list, &scheduled);
                for id in plan.cancel {
                    running.remove(&id);
                }
                for (id, millis) in plan.start {
                    let on_dismiss = on_dismiss.clone();
                    running.insert(id, Timeout::new(millis, move || on_dismiss.emit(id)));
                }
                || ()
            },
            props.toasts.clone(),
        );
    }

    html! {
        <div class={classes!("toast-host", props.class.clone())} aria-live="polite" aria-atomic="true">
            {for props.toasts.iter().map(|toast| render_toast(toast, props.on_dismiss.clone()))}
        </div>
    }
}

fn render_toast(toast: &Toast, on_dismiss: Callback<ToastId>) -> Html {
    let id = toast.id;
    let on_close = Callback::from(move |_| on_dismiss.emit(id));

    html! {
        <div class={classes!("toast", toast.kind.class())} role="status">
            <i class={toast.kind.icon()} aria-hidden="true"></i>
            <span class="toast__message">{toast.message.clone()}</span>
            <button class="toast__close" aria-label="Dismiss" onclick={on_close}>{"\u{00d7}"}</button>
        </div>
    }
}
