use super::*;
use crate::error::FetchError;
use crate::service::CatalogDefinitionService;
use async_trait::async_trait;
use shared::models::{
    AttributeDefinition, AttributeGroupAssignment, AttributeGroupDefinition, AttributeOption,
    AttributeScalar, AttributeVariant, CategoryNode, LocalizedText, OptionsGroup,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

// ========================================================================
// Catalogue fixture
//
//   r1 -> G1 { color: text, material: text }
//   r2 -> G2 { size: single-choice [s, m, l], tags: multi-choice [new, sale, eco] }
//   r3 -> G3 { weight: number (kg) }, G1
// ========================================================================

fn options(slugs: &[&str]) -> OptionsGroup {
    OptionsGroup {
        id: format!("og-{}", slugs.join("-")),
        options: slugs
            .iter()
            .map(|s| AttributeOption {
                id: format!("opt-{}", s),
                slug: s.to_string(),
                display_name: LocalizedText::single("en", s.to_uppercase()),
                color: None,
            })
            .collect(),
    }
}

fn g1() -> AttributeGroupDefinition {
    AttributeGroupDefinition::new("G1")
        .with_attribute(AttributeDefinition::new("A1", "color", AttributeVariant::Text))
        .with_attribute(AttributeDefinition::new("A2", "material", AttributeVariant::Text))
}

fn g2() -> AttributeGroupDefinition {
    AttributeGroupDefinition::new("G2")
        .with_attribute(
            AttributeDefinition::new("A3", "size", AttributeVariant::SingleChoice)
                .with_options(options(&["s", "m", "l"])),
        )
        .with_attribute(
            AttributeDefinition::new("A4", "tags", AttributeVariant::MultiChoice)
                .with_options(options(&["new", "sale", "eco"])),
        )
}

fn g3() -> AttributeGroupDefinition {
    AttributeGroupDefinition::new("G3").with_attribute(
        AttributeDefinition::new("A5", "weight", AttributeVariant::Number).with_metric("kg"),
    )
}

fn catalog() -> CatalogDefinitionService {
    CatalogDefinitionService::new(
        [
            CategoryNode::new("r1").with_group(AttributeGroupAssignment::owned("G1")),
            CategoryNode::new("r2").with_group(AttributeGroupAssignment::owned("G2")),
            CategoryNode::new("r3")
                .with_parent("r1")
                .with_group(AttributeGroupAssignment::owned("G3"))
                .with_group(AttributeGroupAssignment::inherited("G1")),
        ],
        [g1(), g2(), g3()],
    )
}

fn ids(values: &[&str]) -> BTreeSet<CategoryId> {
    values.iter().map(|v| v.to_string()).collect()
}

fn ast_for(selected: &[&str]) -> AttributeAst {
    catalog().resolve_ast(&ids(selected)).unwrap()
}

fn text(values: &[&str]) -> Vec<AttributeScalar> {
    values.iter().map(|v| AttributeScalar::text(*v)).collect()
}

fn controller() -> AttributeFormController<CatalogDefinitionService> {
    controller_with(FormConfig::default())
}

fn controller_with(config: FormConfig) -> AttributeFormController<CatalogDefinitionService> {
    AttributeFormController::new(catalog(), config, AttributeValues::new())
}

// ========================================================================
// Test services
// ========================================================================

type AstResult = Result<AttributeAst, FetchError>;

/// Answers each selection only when the test releases its gate
#[derive(Default)]
struct GatedService {
    gates: Mutex<HashMap<BTreeSet<CategoryId>, oneshot::Receiver<AstResult>>>,
}

impl GatedService {
    fn gate(&self, selected: &[&str]) -> oneshot::Sender<AstResult> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(ids(selected), rx);
        tx
    }
}

#[async_trait]
impl AttributeDefinitionService for GatedService {
    async fn get_ast(&self, selected: &BTreeSet<CategoryId>) -> AstResult {
        let gate = self.gates.lock().unwrap().remove(selected);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".into()))),
            None => Err(FetchError::InvalidResponse("no gate for selection".into())),
        }
    }
}

/// Catalogue service that can be told to time out
struct FlakyService {
    inner: CatalogDefinitionService,
    failures: AtomicUsize,
    calls: AtomicUsize,
}

impl FlakyService {
    fn new() -> Self {
        Self {
            inner: catalog(),
            failures: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttributeDefinitionService for FlakyService {
    async fn get_ast(&self, selected: &BTreeSet<CategoryId>) -> AstResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FetchError::Timeout);
        }
        self.inner.get_ast(selected).await
    }
}

mod test_ordering;
