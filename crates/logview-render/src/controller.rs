//! Interaction state machine over a presentation document
//!
//! Every interactive element gets an id in a table owned by the controller.
//! Events are dispatched on their type and the element's kind; elements carry
//! no behavior of their own. Events are handled one at a time, in order, on
//! whatever thread owns the controller.

use tracing::{debug, trace, warn};

use logview_logs::TextFilter;
use logview_types::ExpandState;

use crate::bridge::HostBridge;
use crate::document::PresentationDocument;

/// Handle to an interactive element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What an element is and where it lives in the document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// A JSON-valued argument with a compact/expanded toggle
    JsonArgument { entry: usize, argument: usize },
    /// A clickable source-location reference
    SourceLink { entry: usize },
}

/// User events, in the order they occur
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// The filter input changed to this text
    FilterChanged(String),
    /// An element was clicked or otherwise activated
    Activate(ElementId),
    /// The expand-all / collapse-all control was activated
    ToggleAll,
}

/// Observable effect of handling one event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed
    Unchanged,
    /// These JSON elements were re-rendered
    Rerendered(Vec<ElementId>),
    /// Visibility was recomputed for every entry
    Filtered { visible: usize },
    /// One open request was sent to the host
    OpenRequested,
}

/// Owns the presentation document and all of its mutable state
pub struct InteractionController {
    document: PresentationDocument,
    elements: Vec<ElementKind>,
    /// Direction of the last global toggle
    all_expanded: bool,
    bridge: HostBridge,
}

impl InteractionController {
    pub fn new(document: PresentationDocument, bridge: HostBridge) -> Self {
        let mut elements = Vec::new();
        for (entry_idx, entry) in document.entries().iter().enumerate() {
            if entry.source_label().is_some() {
                elements.push(ElementKind::SourceLink { entry: entry_idx });
            }
            for (arg_idx, fragment) in entry.fragments().iter().enumerate() {
                if fragment.is_json() {
                    elements.push(ElementKind::JsonArgument {
                        entry: entry_idx,
                        argument: arg_idx,
                    });
                }
            }
        }
        debug!(
            "Controller tracking {} interactive elements over {} entries",
            elements.len(),
            document.len()
        );

        Self {
            document,
            elements,
            all_expanded: false,
            bridge,
        }
    }

    pub fn document(&self) -> &PresentationDocument {
        &self.document
    }

    /// Whether the last global action was "expand all"
    pub fn all_expanded(&self) -> bool {
        self.all_expanded
    }

    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.elements.get(id.0).copied()
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, ElementKind)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(idx, kind)| (ElementId(idx), *kind))
    }

    /// Id of the toggle for a JSON argument
    pub fn json_element(&self, entry: usize, argument: usize) -> Option<ElementId> {
        self.find(ElementKind::JsonArgument { entry, argument })
    }

    /// Id of an entry's source reference
    pub fn source_element(&self, entry: usize) -> Option<ElementId> {
        self.find(ElementKind::SourceLink { entry })
    }

    /// JSON toggles belonging to one entry, in argument order
    pub fn json_elements_of(&self, entry: usize) -> Vec<ElementId> {
        self.elements()
            .filter(|(_, kind)| {
                matches!(kind, ElementKind::JsonArgument { entry: e, .. } if *e == entry)
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn find(&self, wanted: ElementKind) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|kind| *kind == wanted)
            .map(ElementId)
    }

    /// Process one event
    pub fn handle(&mut self, event: UiEvent) -> Outcome {
        trace!("Handling {:?}", event);
        match event {
            UiEvent::FilterChanged(needle) => self.apply_filter(&needle),
            UiEvent::ToggleAll => self.toggle_all(),
            UiEvent::Activate(id) => match self.kind(id) {
                Some(ElementKind::JsonArgument { entry, argument }) => {
                    self.toggle(id, entry, argument)
                }
                Some(ElementKind::SourceLink { entry }) => self.open_source(entry),
                None => {
                    debug!("Ignoring activation of unknown element {:?}", id);
                    Outcome::Unchanged
                }
            },
        }
    }

    /// Recompute visibility of every entry against a new needle
    ///
    /// Re-applying the current needle is a no-op.
    fn apply_filter(&mut self, needle: &str) -> Outcome {
        if needle == self.document.filter().needle() {
            return Outcome::Unchanged;
        }

        let filter = TextFilter::new(needle);
        let mut visible = 0;
        for entry in self.document.entries_mut() {
            let matches = filter.matches(entry.search_text());
            entry.set_visible(matches);
            if matches {
                visible += 1;
            }
        }
        self.document.set_filter(filter);

        debug!("Filter {:?} leaves {} entries visible", needle, visible);
        Outcome::Filtered { visible }
    }

    /// Flip a single JSON argument
    fn toggle(&mut self, id: ElementId, entry: usize, argument: usize) -> Outcome {
        let current = self
            .document
            .entry(entry)
            .and_then(|e| e.fragments().get(argument))
            .map(|f| f.state());
        let Some(current) = current else {
            return Outcome::Unchanged;
        };

        if self.set_state(entry, argument, current.toggled()) {
            Outcome::Rerendered(vec![id])
        } else {
            Outcome::Unchanged
        }
    }

    /// Move every JSON argument to the opposite of the last global action
    fn toggle_all(&mut self) -> Outcome {
        let target = if self.all_expanded {
            ExpandState::Compact
        } else {
            ExpandState::Expanded
        };

        let mut changed = Vec::new();
        for idx in 0..self.elements.len() {
            if let ElementKind::JsonArgument { entry, argument } = self.elements[idx] {
                if self.set_state(entry, argument, target) {
                    changed.push(ElementId(idx));
                }
            }
        }
        self.all_expanded = target.is_expanded();

        debug!(
            "Global toggle to {} re-rendered {} elements",
            target.as_str(),
            changed.len()
        );
        Outcome::Rerendered(changed)
    }

    /// Re-render one fragment from its payload; false if nothing changed
    fn set_state(&mut self, entry: usize, argument: usize, target: ExpandState) -> bool {
        let renderer = self.document.renderer().clone();
        let Some(fragment) = self
            .document
            .entry_mut(entry)
            .and_then(|e| e.fragment_mut(argument))
        else {
            return false;
        };
        if fragment.state() == target {
            return false;
        }
        let Some(payload) = fragment.payload() else {
            return false;
        };

        match renderer.rerender(payload, target) {
            Ok(rendered) => {
                *fragment = rendered;
                true
            }
            Err(e) => {
                warn!("Could not re-render argument {} of entry {}: {}", argument, entry, e);
                false
            }
        }
    }

    /// Send an open request for an entry's source; local state is untouched
    fn open_source(&self, entry: usize) -> Outcome {
        let Some(rendered) = self.document.entry(entry) else {
            return Outcome::Unchanged;
        };
        let source = &rendered.entry().source;
        self.bridge
            .request_open_location(&source.path, source.line, source.column);
        Outcome::OpenRequested
    }
}
