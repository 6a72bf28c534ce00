//! Request handling against one open surface and its island

use crate::protocol::{CliError, Request};
use quill::{Activation, Element, Island, Quill, Surface};
use serde_json::{json, Value as JsonValue};
use tracing::debug;

struct Page {
    surface: Surface,
    island: Island,
}

pub struct Session {
    quill: Quill,
    page: Option<Page>,
}

impl Session {
    pub fn new(quill: Quill) -> Self {
        Self { quill, page: None }
    }

    pub async fn handle(&mut self, request: Request) -> Result<JsonValue, CliError> {
        match request {
            Request::Open { text, regions, triggers, arg_sources, config } => {
                let mut surface = Surface::new(&text);
                for r in &regions {
                    surface.add_region(r.id.as_str(), r.role.as_deref(), r.start, r.end)?;
                }

                let mut island = match config {
                    Some(cfg) => Island::with_config("cli", cfg),
                    None => self.quill.island("cli"),
                };
                for t in &triggers {
                    island.add_trigger(&t.modifier, t.args.as_deref());
                }
                for s in arg_sources {
                    let mut element = Element::new().text(s.text);
                    if let Some(v) = s.value {
                        element = element.value(v);
                    }
                    if let Some(v) = s.data_value {
                        element = element.attr(&island.config().value_attr, v);
                    }
                    island.add_arg_source(&s.key, element);
                }
                self.quill.init_island(&mut island).await;

                debug!(chars = surface.len_chars(), regions = regions.len(), "surface opened");
                self.page = Some(Page { surface, island });
                Ok(json!({ "opened": true, "modifiers": self.quill.registry().len() }))
            }
            Request::Select { anchor, head } => {
                let page = self.page_mut()?;
                page.surface.select(anchor, head)?;
                Ok(json!({ "selected": page.surface.selected_text() }))
            }
            Request::Deselect => {
                self.page_mut()?.surface.clear_selection();
                Ok(json!({ "selected": "" }))
            }
            Request::SetArg { key, value } => {
                let page = self.page_mut()?;
                let attr = page.island.config().arg_source_attr.clone();
                let id = page.island.elements()
                    .find(&attr, &key)
                    .ok_or_else(|| CliError::NoSuchArgSource(key.clone()))?;
                if let Some(element) = page.island.elements_mut().get_mut(id) {
                    element.set_value(value);
                }
                Ok(json!({ "key": key }))
            }
            Request::Click { modifier } => {
                let page = self.page_mut()?;
                let attr = page.island.config().modifier_attr.clone();
                let trigger = page.island.elements()
                    .find(&attr, &modifier)
                    .ok_or_else(|| CliError::NoSuchTrigger(modifier.clone()))?;
                match page.island.activate(trigger, &mut page.surface) {
                    Activation::Completed(outcome) => Ok(serde_json::to_value(&outcome)?),
                    Activation::Ignored(why) => Ok(json!({ "ignored": format!("{:?}", why) })),
                }
            }
            Request::List => Ok(serde_json::to_value(self.quill.list_modifiers())?),
            Request::Text => {
                let page = self.page_mut()?;
                Ok(json!({
                    "text": page.surface.text(),
                    "selection": page.surface.selection(),
                    "regions": page.surface.regions(),
                }))
            }
        }
    }

    fn page_mut(&mut self) -> Result<&mut Page, CliError> {
        self.page.as_mut().ok_or(CliError::NotOpen)
    }
}
