use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::CompileError;
use crate::eval::Predicate;
use crate::parser::compile;

/// Maps condition source text to its compiled predicate so repeated
/// evaluations skip the compiler. Entries are inserted only on success:
/// text that failed to compile is re-attempted on the next lookup. The map
/// grows for the process lifetime; rule sets are human-authored and small.
#[derive(Debug, Default)]
pub struct PredicateCache {
    inner: Mutex<HashMap<String, Arc<Predicate>>>,
}

impl PredicateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached predicate for `condition`, compiling on first sight.
    ///
    /// Compilation runs outside the lock. Two threads racing on the same
    /// uncached text may both compile it; predicates are pure, so they
    /// converge on one entry and the loser's work is discarded.
    pub fn get_or_compile(&self, condition: &str) -> Result<Arc<Predicate>, CompileError> {
        let condition = condition.trim();
        if let Some(predicate) = self.lock().get(condition) {
            return Ok(Arc::clone(predicate));
        }

        let compiled = Arc::new(compile(condition)?);
        let mut cache = self.lock();
        let entry = cache.entry(condition.to_string()).or_insert(compiled);
        Ok(Arc::clone(entry))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Predicate>>> {
        // Predicates are immutable once inserted; a poisoned lock holds no
        // broken invariant worth dying over.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
