/*!
# Results Document Loader

Reads the nested JSON document written by the analysis engine's exporter:

```json
{
  "header": "main",
  "details": ["store to @counter forwarded"],
  "children": [
    { "call": { "header": "helper(i32)", "children": [] } },
    { "loop": { "header": "for.body", "iterations": [ { "header": "iteration 0" } ] } }
  ]
}
```
*/

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::tag::{AttemptId, PeelId};
use super::tree::{ResultTree, ResultTreeBuilder};
use crate::core::{ViewerError, ViewerResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptDocument {
    pub header: String,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub children: Vec<ChildDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildDocument {
    Call(AttemptDocument),
    Loop(LoopDocument),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopDocument {
    pub header: String,
    #[serde(default)]
    pub iterations: Vec<AttemptDocument>,
}

impl ResultTree {
    pub fn from_json_str(json: &str) -> ViewerResult<Self> {
        let document: AttemptDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(&document))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ViewerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ViewerError::TreeLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded {} attempts and {} loops from {}",
            tree.attempt_count(),
            tree.peel_count(),
            path.display()
        );
        Ok(tree)
    }

    pub fn from_document(document: &AttemptDocument) -> Self {
        let mut builder = ResultTreeBuilder::new(document.header.clone());
        let root = builder.root();
        fill_attempt(&mut builder, root, document);
        builder.build()
    }
}

fn fill_attempt(builder: &mut ResultTreeBuilder, id: AttemptId, document: &AttemptDocument) {
    for line in &document.details {
        builder.add_detail(id, line.clone());
    }
    for child in &document.children {
        match child {
            ChildDocument::Call(call) => {
                let call_id = builder.add_call(id, call.header.clone());
                fill_attempt(builder, call_id, call);
            }
            ChildDocument::Loop(lp) => {
                let peel_id = builder.add_peel(id, lp.header.clone());
                fill_loop(builder, peel_id, lp);
            }
        }
    }
}

fn fill_loop(builder: &mut ResultTreeBuilder, id: PeelId, document: &LoopDocument) {
    for iteration in &document.iterations {
        let iteration_id = builder.add_iteration(id, iteration.header.clone());
        fill_attempt(builder, iteration_id, iteration);
    }
}
