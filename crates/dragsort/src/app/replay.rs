//! Scripted drag scenarios: render lists into a [`Dom`], feed events, collect the outcome.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::dom::Dom;
use crate::app::engine::DragSort;
use crate::app::session::{OverlapPolicy, Transition};
use crate::domain::errors::DomainError;
use crate::domain::model::{ElementId, Group, ListId, ListOptions, ReorderInstruction};
use crate::domain::selector::Selector;
use crate::infra::config::Config;

/// Class carried by every rendered list container.
pub const LIST_CLASS: &str = "dragSortList";
/// Class carried by every rendered item wrapper.
pub const ITEM_CLASS: &str = "dragSortItem";

/// A scenario: lists to render and the events to deliver, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub lists: Vec<ScriptList>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptList {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub custom_wrapper: Option<bool>,
    /// Extra class for item wrappers; only applied when the custom wrapper is enabled.
    #[serde(default)]
    pub wrapper_class: Option<String>,
    #[serde(default)]
    pub dragging_enabled: Option<bool>,
    #[serde(default)]
    pub source_only: bool,
    #[serde(default)]
    pub items: Vec<Value>,
    /// Elements rendered inside every item wrapper.
    #[serde(default)]
    pub template: Vec<ScriptElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptElement {
    #[serde(default = "ScriptElement::default_tag")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class: Vec<String>,
    #[serde(default)]
    pub children: Vec<ScriptElement>,
}

impl ScriptElement {
    fn default_tag() -> String {
        "div".into()
    }
}

/// One input event. `target` is a selector resolved inside the item (or list container).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", deny_unknown_fields)]
pub enum ScriptEvent {
    Start {
        list: String,
        item: usize,
        #[serde(default)]
        target: Option<String>,
    },
    Hover {
        list: String,
        #[serde(default)]
        item: Option<usize>,
        #[serde(default)]
        target: Option<String>,
    },
    End,
}

/// Serialization format of a script file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    Yaml,
    Json,
}

impl ScriptFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(ScriptFormat::Yaml),
            "json" => Some(ScriptFormat::Json),
            _ => None,
        }
    }
}

impl Script {
    pub fn from_path(path: &Path) -> Result<Self> {
        let Some(format) = ScriptFormat::from_path(path) else {
            bail!(
                "unsupported script extension for {} (expected .yaml, .yml or .json)",
                path.display()
            );
        };
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read script: {}", path.display()))?;
        Self::parse(&data, format).with_context(|| format!("invalid script: {}", path.display()))
    }

    pub fn parse(contents: &str, format: ScriptFormat) -> Result<Self> {
        let script = match format {
            ScriptFormat::Yaml => serde_yaml::from_str(contents)?,
            ScriptFormat::Json => serde_json::from_str(contents)?,
        };
        Ok(script)
    }
}

/// Knobs applied to a replay, usually taken from [`Config`].
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub overlap: OverlapPolicy,
    pub dragging_enabled: bool,
    pub custom_wrapper: bool,
}

impl ReplayOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            overlap: config.engine.overlap_policy(),
            dragging_enabled: config.lists.dragging_enabled(),
            custom_wrapper: config.lists.custom_wrapper(),
        }
    }
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Reorder instruction with lists referred to by script name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderRecord {
    pub group: Option<String>,
    pub dragged_item: Value,
    pub source_list: String,
    pub target_list: String,
    pub source_index: usize,
    pub target_index: usize,
}

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReplayReport {
    /// One line per event, in delivery order.
    pub transitions: Vec<String>,
    pub instructions: Vec<ReorderRecord>,
}

struct RenderedList {
    id: ListId,
    name: String,
    container: ElementId,
    items: Vec<ElementId>,
}

/// Render `script`, deliver its events, and report what the engine did.
pub fn run(script: &Script, options: &ReplayOptions) -> Result<ReplayReport> {
    let mut dom = Dom::new();
    let body = dom.create_element("body");
    let mut engine: DragSort<Value, Vec<ReorderInstruction<Value>>> =
        DragSort::new(Vec::new()).with_overlap_policy(options.overlap);

    let mut rendered: Vec<RenderedList> = Vec::new();
    for list in &script.lists {
        if rendered.iter().any(|existing| existing.name == list.name) {
            bail!("duplicate list name '{}'", list.name);
        }
        let (mount_options, wrapper_class) = list_options(list, options)?;
        let container = dom.create_element("div");
        dom.add_class(container, LIST_CLASS)?;
        dom.append_child(body, container)?;

        let mut items = Vec::with_capacity(list.items.len());
        for _ in &list.items {
            let wrapper = dom.create_element("div");
            dom.add_class(wrapper, ITEM_CLASS)?;
            if let Some(class) = wrapper_class {
                dom.add_class(wrapper, class)?;
            }
            dom.append_child(container, wrapper)?;
            render_template(&mut dom, wrapper, &list.template)?;
            items.push(wrapper);
        }

        let id = engine
            .registry_mut()
            .mount(mount_options, container, list.items.clone(), items.clone())
            .with_context(|| format!("failed to mount list '{}'", list.name))?;
        rendered.push(RenderedList {
            id,
            name: list.name.clone(),
            container,
            items,
        });
    }

    let mut transitions = Vec::with_capacity(script.events.len());
    for event in &script.events {
        let transition = match event {
            ScriptEvent::Start { list, item, target } => {
                let list = find_list(&rendered, list)?;
                let root = item_element(list, *item)?;
                let origin = resolve_target(&dom, root, target.as_deref())?;
                engine.drag_start(&dom, origin)
            }
            ScriptEvent::Hover { list, item, target } => {
                let list = find_list(&rendered, list)?;
                let root = match item {
                    Some(index) => item_element(list, *index)?,
                    None => list.container,
                };
                let over = resolve_target(&dom, root, target.as_deref())?;
                engine.drag_hover(&dom, list.id, over)
            }
            ScriptEvent::End => engine.drag_end(),
        };
        transitions.push(describe(&transition, &rendered));
    }

    let instructions = engine
        .into_sink()
        .into_iter()
        .map(|instruction| record(instruction, &rendered))
        .collect();

    Ok(ReplayReport {
        transitions,
        instructions,
    })
}

fn list_options<'a>(
    list: &'a ScriptList,
    defaults: &ReplayOptions,
) -> Result<(ListOptions, Option<&'a str>)> {
    let handle = list
        .handle
        .as_deref()
        .map(str::parse::<Selector>)
        .transpose()
        .with_context(|| format!("invalid handle for list '{}'", list.name))?;
    let custom_wrapper = list.custom_wrapper.unwrap_or(defaults.custom_wrapper);

    let options = ListOptions {
        group: list.group.clone().map(Group::new),
        handle,
        custom_wrapper,
        dragging_enabled: list.dragging_enabled.unwrap_or(defaults.dragging_enabled),
        source_only: list.source_only,
    };
    // The renderer consumes the wrapper flag; the engine never looks at it.
    let wrapper_class = list.wrapper_class.as_deref().filter(|_| custom_wrapper);
    Ok((options, wrapper_class))
}

fn render_template(dom: &mut Dom, parent: ElementId, template: &[ScriptElement]) -> Result<()> {
    for node in template {
        let element = dom.create_element(&node.tag);
        if let Some(id) = &node.id {
            dom.set_id(element, id)?;
        }
        for class in &node.class {
            dom.add_class(element, class)?;
        }
        dom.append_child(parent, element)?;
        render_template(dom, element, &node.children)?;
    }
    Ok(())
}

fn find_list<'a>(rendered: &'a [RenderedList], name: &str) -> Result<&'a RenderedList> {
    rendered
        .iter()
        .find(|list| list.name == name)
        .ok_or_else(|| unknown("list", name.to_owned()))
}

fn item_element(list: &RenderedList, index: usize) -> Result<ElementId> {
    list.items
        .get(index)
        .copied()
        .ok_or_else(|| unknown("item", format!("{}[{index}]", list.name)))
}

fn resolve_target(dom: &Dom, root: ElementId, target: Option<&str>) -> Result<ElementId> {
    let Some(text) = target else {
        return Ok(root);
    };
    let selector: Selector = text.parse()?;
    dom.query(root, &selector)
        .ok_or_else(|| unknown("element", text.to_owned()))
}

fn unknown(kind: &'static str, name: String) -> anyhow::Error {
    DomainError::UnknownReference { kind, name }.into()
}

fn list_name(rendered: &[RenderedList], id: ListId) -> String {
    rendered
        .iter()
        .find(|list| list.id == id)
        .map(|list| list.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn describe(transition: &Transition, rendered: &[RenderedList]) -> String {
    match transition {
        Transition::Started(item) => {
            format!("started {}[{}]", list_name(rendered, item.list), item.index)
        }
        Transition::Restarted(item) => {
            format!("restarted {}[{}]", list_name(rendered, item.list), item.index)
        }
        Transition::Retargeted(item) => {
            format!("retargeted {}[{}]", list_name(rendered, item.list), item.index)
        }
        other => other.to_string(),
    }
}

fn record(instruction: ReorderInstruction<Value>, rendered: &[RenderedList]) -> ReorderRecord {
    ReorderRecord {
        group: instruction.group.map(|group| group.as_str().to_owned()),
        dragged_item: instruction.dragged_item,
        source_list: list_name(rendered, instruction.source_list),
        target_list: list_name(rendered, instruction.target_list),
        source_index: instruction.source_index,
        target_index: instruction.target_index,
    }
}
