use std::sync::Arc;

use reclass_rules::RuleEvaluator;
use reclass_storage::MemoryStore;

use crate::rulegen::RuleGenerator;

/// Shared application state: the store, the rule evaluator (which owns the
/// predicate cache for the process lifetime), and the rule-generation
/// collaborator.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub evaluator: Arc<RuleEvaluator>,
    pub generator: Arc<RuleGenerator>,
}

impl AppState {
    pub fn new(store: MemoryStore, generator: RuleGenerator) -> Self {
        AppState {
            store: Arc::new(store),
            evaluator: Arc::new(RuleEvaluator::new()),
            generator: Arc::new(generator),
        }
    }
}
