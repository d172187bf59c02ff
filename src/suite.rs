//! JSON check suites run by the `page-components` binary.
//!
//! A suite declares components and a list of steps; each step performs one
//! action or assertion on a component, optionally narrowed by a group chain.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::component::{
    BasicComponent, Checkable, Clickable, Component, Filterable, Focusable, Form, Group, Input,
    Interactive, InteractiveComponent, LookupOptions, Select, Selectable, Submittable, Typeable,
    TypeableComponent,
};
use crate::driver::{CollectionOp, SharedDriver};

#[derive(Debug, Clone, Deserialize)]
pub struct Suite {
    /// Page to open before the first step.
    pub url: Option<String>,
    pub components: Vec<ComponentDecl>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    #[default]
    Basic,
    Interactive,
    Typeable,
    Input,
    Select,
    Form,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentDecl {
    pub id: String,
    #[serde(default)]
    pub kind: ComponentKind,
    pub selector: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainStep {
    pub op: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub component: String,
    #[serde(default)]
    pub chain: Vec<ChainStep>,
    pub action: Option<String>,
    pub should: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Step {
    fn describe(&self) -> String {
        let mut target = self.component.clone();
        for link in &self.chain {
            target.push_str(&format!(".{}({})", link.op, link.args.join(", ")));
        }
        match (&self.action, &self.should) {
            (Some(action), _) => format!("{} {}({})", target, action, self.args.join(", ")),
            (None, Some(chainer)) => format!("{} should {} {}", target, chainer, self.args.join(", ")),
            (None, None) => target,
        }
    }
}

/// Outcome of a suite run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub passed: usize,
    pub total: usize,
    pub elapsed_ms: u128,
    pub failure: Option<String>,
}

impl Report {
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn format_output(&self) -> String {
        let mut out = format!(
            "{}/{} steps passed in {}ms",
            self.passed, self.total, self.elapsed_ms
        );
        if let Some(ref failure) = self.failure {
            out.push_str(&format!("\nFailed: {}", failure));
        }
        out
    }
}

impl Suite {
    pub fn from_json(json: &str) -> Result<Self> {
        let suite: Suite = serde_json::from_str(json).context("Failed to parse suite")?;
        suite.validate()?;
        Ok(suite)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read suite {}", path.display()))?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for component in &self.components {
            if !seen.insert(component.id.as_str()) {
                bail!("Duplicate component id '{}'", component.id);
            }
        }
        for (i, step) in self.steps.iter().enumerate() {
            if !seen.contains(step.component.as_str()) {
                bail!("Step {} refers to unknown component '{}'", i + 1, step.component);
            }
            if step.action.is_some() == step.should.is_some() {
                bail!("Step {} must have exactly one of 'action' or 'should'", i + 1);
            }
            for link in &step.chain {
                parse_op(link)?;
            }
        }
        Ok(())
    }

    /// Run every step in order, stopping at the first failure.
    pub async fn run(&self, driver: &SharedDriver) -> Result<Report> {
        let components: HashMap<&str, AnyComponent> = self
            .components
            .iter()
            .map(|decl| (decl.id.as_str(), AnyComponent::build(driver, decl)))
            .collect();

        let start = Instant::now();
        let mut passed = 0;
        let mut failure = None;
        for step in &self.steps {
            let description = step.describe();
            let component = components
                .get(step.component.as_str())
                .with_context(|| format!("Unknown component '{}'", step.component))?;
            match run_step(component, step).await {
                Ok(()) => {
                    tracing::info!("ok    {}", description);
                    passed += 1;
                }
                Err(e) => {
                    tracing::error!("FAIL  {}: {:#}", description, e);
                    failure = Some(format!("{}: {:#}", description, e));
                    break;
                }
            }
        }

        Ok(Report {
            passed,
            total: self.steps.len(),
            elapsed_ms: start.elapsed().as_millis(),
            failure,
        })
    }
}

fn parse_op(link: &ChainStep) -> Result<CollectionOp> {
    let arg = |i: usize| -> Result<String> {
        link.args
            .get(i)
            .cloned()
            .with_context(|| format!("'{}' needs argument {}", link.op, i + 1))
    };
    Ok(match link.op.as_str() {
        "filter" => CollectionOp::Filter(arg(0)?),
        "not" => CollectionOp::Not(arg(0)?),
        "eq" => CollectionOp::Eq(
            arg(0)?
                .parse()
                .with_context(|| format!("'eq' needs an integer, got {:?}", link.args[0]))?,
        ),
        "first" => CollectionOp::First,
        "last" => CollectionOp::Last,
        "contains" if link.args.len() >= 2 => CollectionOp::Contains {
            selector: Some(arg(0)?),
            text: arg(1)?,
        },
        "contains" => CollectionOp::Contains {
            selector: None,
            text: arg(0)?,
        },
        "find" => CollectionOp::Find(arg(0)?),
        other => bail!("Unknown group operation '{}'", other),
    })
}

/// A suite component of whichever kind was declared.
#[derive(Clone)]
enum AnyComponent {
    Basic(Group<BasicComponent>),
    Interactive(Group<InteractiveComponent>),
    Typeable(Group<TypeableComponent>),
    Input(Group<Input>),
    Select(Group<Select>),
    Form(Group<Form>),
}

macro_rules! each_kind {
    ($value:expr, $c:ident => $body:expr) => {
        match $value {
            AnyComponent::Basic($c) => $body,
            AnyComponent::Interactive($c) => $body,
            AnyComponent::Typeable($c) => $body,
            AnyComponent::Input($c) => $body,
            AnyComponent::Select($c) => $body,
            AnyComponent::Form($c) => $body,
        }
    };
}

impl AnyComponent {
    fn build(driver: &SharedDriver, decl: &ComponentDecl) -> Self {
        let lookup = LookupOptions {
            selector: decl.selector.clone(),
            text: decl.text.clone(),
            resolver: None,
        };
        let id = decl.id.as_str();
        match decl.kind {
            ComponentKind::Basic => Self::Basic(Group::new(driver, id, lookup)),
            ComponentKind::Interactive => Self::Interactive(Group::new(driver, id, lookup)),
            ComponentKind::Typeable => Self::Typeable(Group::new(driver, id, lookup)),
            ComponentKind::Input => Self::Input(Group::new(driver, id, lookup)),
            ComponentKind::Select => Self::Select(Group::new(driver, id, lookup)),
            ComponentKind::Form => Self::Form(Group::new(driver, id, lookup)),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Basic(_) => "basic",
            Self::Interactive(_) => "interactive",
            Self::Typeable(_) => "typeable",
            Self::Input(_) => "input",
            Self::Select(_) => "select",
            Self::Form(_) => "form",
        }
    }

    fn chained(&self, op: CollectionOp) -> Self {
        each_kind!(self, c => c.chain(op).into_any())
    }
}

trait IntoAny {
    fn into_any(self) -> AnyComponent;
}

macro_rules! into_any {
    ($($variant:ident => $ty:ty),*) => {
        $(impl IntoAny for Group<$ty> {
            fn into_any(self) -> AnyComponent {
                AnyComponent::$variant(self)
            }
        })*
    };
}

into_any!(
    Basic => BasicComponent,
    Interactive => InteractiveComponent,
    Typeable => TypeableComponent,
    Input => Input,
    Select => Select,
    Form => Form
);

async fn run_step(component: &AnyComponent, step: &Step) -> Result<()> {
    let mut target = component.clone();
    for link in &step.chain {
        target = target.chained(parse_op(link)?);
    }
    let args: Vec<&str> = step.args.iter().map(String::as_str).collect();

    if let Some(chainer) = &step.should {
        each_kind!(&target, c => { c.should(chainer, &args).await?; });
        return Ok(());
    }

    let action = step.action.as_deref().unwrap_or_default();
    let handled = match &target {
        AnyComponent::Basic(c) => pointer_action(c, action, &args).await?,
        AnyComponent::Interactive(c) => {
            pointer_action(c, action, &args).await? || state_action(c, action).await?
        }
        AnyComponent::Typeable(c) => {
            pointer_action(c, action, &args).await?
                || state_action(c, action).await?
                || text_action(c, action, &args).await?
        }
        AnyComponent::Input(c) => {
            pointer_action(c, action, &args).await?
                || state_action(c, action).await?
                || text_action(c, action, &args).await?
                || check_action(c, action).await?
        }
        AnyComponent::Select(c) => {
            pointer_action(c, action, &args).await?
                || state_action(c, action).await?
                || text_action(c, action, &args).await?
                || check_action(c, action).await?
                || select_action(c, action, &args).await?
        }
        AnyComponent::Form(c) => {
            pointer_action(c, action, &args).await?
                || state_action(c, action).await?
                || form_action(c, action).await?
        }
    };

    if !handled {
        bail!(
            "Component '{}' ({}) does not support action '{}'",
            step.component,
            target.kind(),
            action
        );
    }
    Ok(())
}

fn first_arg<'a>(action: &str, args: &[&'a str]) -> Result<&'a str> {
    args.first()
        .copied()
        .with_context(|| format!("'{}' needs an argument", action))
}

async fn pointer_action<C: Clickable + Focusable>(c: &C, action: &str, args: &[&str]) -> Result<bool> {
    match action {
        "click" => c.click().await.map(drop)?,
        "click_if_visible" => {
            let timeout = match args.first() {
                Some(ms) => Some(Duration::from_millis(
                    ms.parse().with_context(|| format!("Invalid timeout {:?}", ms))?,
                )),
                None => None,
            };
            c.click_if_visible(timeout).await.map(drop)?
        }
        "double_click" => c.double_click().await.map(drop)?,
        "right_click" => c.right_click().await.map(drop)?,
        "hover" => c.hover().await.map(drop)?,
        "scroll_into_view" => c
            .scroll_into_view(args.first() == Some(&"smooth"))
            .await
            .map(drop)?,
        "focus" => c.focus().await.map(drop)?,
        "blur" => c.blur().await.map(drop)?,
        "press_enter" => c.press_enter().await.map(drop)?,
        "press_space" => c.press_space().await.map(drop)?,
        "press_up_arrow" => c.press_up_arrow().await.map(drop)?,
        "press_down_arrow" => c.press_down_arrow().await.map(drop)?,
        _ => return Ok(false),
    }
    Ok(true)
}

async fn state_action<C: Interactive>(c: &C, action: &str) -> Result<bool> {
    match action {
        "enable" => c.enable().await.map(drop)?,
        "disable" => c.disable().await.map(drop)?,
        _ => return Ok(false),
    }
    Ok(true)
}

async fn text_action<C: Typeable>(c: &C, action: &str, args: &[&str]) -> Result<bool> {
    match action {
        "type" => c.type_text(first_arg(action, args)?).await.map(drop)?,
        "clear" => c.clear().await.map(drop)?,
        _ => return Ok(false),
    }
    Ok(true)
}

async fn check_action<C: Checkable>(c: &C, action: &str) -> Result<bool> {
    match action {
        "check" => c.check().await.map(drop)?,
        "uncheck" => c.uncheck().await.map(drop)?,
        "toggle" => c.toggle().await.map(drop)?,
        _ => return Ok(false),
    }
    Ok(true)
}

async fn select_action<C: Selectable>(c: &C, action: &str, args: &[&str]) -> Result<bool> {
    match action {
        "select" => c.select_option(first_arg(action, args)?).await.map(drop)?,
        _ => return Ok(false),
    }
    Ok(true)
}

async fn form_action<C: Submittable>(c: &C, action: &str) -> Result<bool> {
    match action {
        "submit" => c.submit().await.map(drop)?,
        _ => return Ok(false),
    }
    Ok(true)
}
