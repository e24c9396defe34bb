//! Rendered nodes and the listener table bound to their interactive regions.
//!
//! Interactive regions are marked in markup with `data-me-action="<name>"`.
//! An [`Element`] discovers them once at construction and only lets handlers
//! bind to controls that actually exist in its markup.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt,
};

use scraper::{Html, Selector};
use tracing::debug;
use uuid::Uuid;

use crate::error::AgentError;

pub const ACTION_ATTR: &str = "data-me-action";

pub type Handler = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub Uuid);

impl NodeId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "me-node-{}", self.0.simple())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Control {
    Back,
    Close,
    Confirm,
    ViewOffers,
}

impl Control {
    pub fn action(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Close => "close",
            Self::Confirm => "confirm",
            Self::ViewOffers => "view-offers",
        }
    }

    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "back" => Some(Self::Back),
            "close" => Some(Self::Close),
            "confirm" => Some(Self::Confirm),
            "view-offers" => Some(Self::ViewOffers),
            _ => None,
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

struct Binding {
    handler: Handler,
    once: bool,
}

/// A mounted piece of markup plus the handlers bound to its controls.
pub struct Element {
    id: NodeId,
    markup: String,
    controls: BTreeSet<Control>,
    bindings: HashMap<Control, Binding>,
    fired_once: HashSet<Control>,
}

impl Element {
    pub fn from_markup(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let controls = discover_controls(&markup);
        let id = NodeId::fresh();
        debug!(node = %id, controls = ?controls, "element created");
        Self {
            id,
            markup,
            controls,
            bindings: HashMap::new(),
            fired_once: HashSet::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn controls(&self) -> impl Iterator<Item = Control> + '_ {
        self.controls.iter().copied()
    }

    pub fn has_control(&self, control: Control) -> bool {
        self.controls.contains(&control)
    }

    /// Fails with the full list of controls absent from this element's markup.
    pub fn require_controls(&self, required: &[Control]) -> Result<(), AgentError> {
        let missing: Vec<Control> = required
            .iter()
            .copied()
            .filter(|control| !self.has_control(*control))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AgentError::ListenerAttach {
                node: self.id,
                missing,
            })
        }
    }

    /// Binds `handler` to `control`, replacing whatever was bound before.
    pub fn bind(
        &mut self,
        control: Control,
        handler: impl FnMut() + 'static,
    ) -> Result<(), AgentError> {
        self.install(control, Box::new(handler), false)
    }

    /// Like [`Element::bind`], but the control fires at most once for the
    /// lifetime of this element, even across rebinding.
    pub fn bind_once(
        &mut self,
        control: Control,
        handler: impl FnMut() + 'static,
    ) -> Result<(), AgentError> {
        self.install(control, Box::new(handler), true)
    }

    fn install(&mut self, control: Control, handler: Handler, once: bool) -> Result<(), AgentError> {
        self.require_controls(&[control])?;
        let replaced = self
            .bindings
            .insert(control, Binding { handler, once })
            .is_some();
        debug!(node = %self.id, %control, once, replaced, "listener bound");
        Ok(())
    }

    /// Dispatches a user gesture on `control`. Returns whether a handler ran.
    pub fn click(&mut self, control: Control) -> bool {
        let Some(binding) = self.bindings.get_mut(&control) else {
            debug!(node = %self.id, %control, "click on unbound control ignored");
            return false;
        };
        if binding.once && !self.fired_once.insert(control) {
            debug!(node = %self.id, %control, "repeated click suppressed");
            return false;
        }
        (binding.handler)();
        true
    }

    pub fn is_bound(&self, control: Control) -> bool {
        self.bindings.contains_key(&control)
    }

    pub fn listener_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn detach(&mut self, control: Control) -> bool {
        self.bindings.remove(&control).is_some()
    }

    pub fn detach_all(&mut self) {
        if !self.bindings.is_empty() {
            debug!(node = %self.id, count = self.bindings.len(), "listeners detached");
        }
        self.bindings.clear();
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("controls", &self.controls)
            .field("bound", &self.bindings.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn discover_controls(markup: &str) -> BTreeSet<Control> {
    let fragment = Html::parse_fragment(markup);
    let Ok(selector) = Selector::parse("[data-me-action]") else {
        return BTreeSet::new();
    };
    fragment
        .select(&selector)
        .filter_map(|node| node.value().attr(ACTION_ATTR))
        .filter_map(Control::from_action)
        .collect()
}

#[cfg(test)]
#[path = "tests/element_tests.rs"]
mod tests;
