use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Equal,
    Insert,
    Delete,
}

/// A maximal run of tokens sharing one edit kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOp<T> {
    pub kind: EditKind,
    pub run: Vec<T>,
}

impl<T> EditOp<T> {
    pub fn len(&self) -> usize {
        self.run.len()
    }

    pub fn is_empty(&self) -> bool {
        self.run.is_empty()
    }
}

/// Edit script between a reference and a hypothesis token sequence.
///
/// Adjacent operations never share a kind: `push` folds a step into the
/// previous run when the kinds agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Alignment<T> {
    ops: Vec<EditOp<T>>,
}

impl<T> Default for Alignment<T> {
    fn default() -> Self {
        Self { ops: Vec::new() }
    }
}

impl<T> Alignment<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: EditKind, token: T) {
        match self.ops.last_mut() {
            Some(last) if last.kind == kind => last.run.push(token),
            _ => self.ops.push(EditOp {
                kind,
                run: vec![token],
            }),
        }
    }

    pub fn push_run(&mut self, kind: EditKind, run: impl IntoIterator<Item = T>) {
        for token in run {
            self.push(kind, token);
        }
    }

    pub fn ops(&self) -> &[EditOp<T>] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// True when the script contains no insertions or deletions.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| op.kind == EditKind::Equal)
    }

    /// Tokens of the `Equal` and `Delete` runs, i.e. the reference sequence.
    pub fn reference_tokens(&self) -> Vec<&T> {
        self.tokens_where(|kind| kind != EditKind::Insert)
    }

    /// Tokens of the `Equal` and `Insert` runs, i.e. the hypothesis sequence.
    pub fn hypothesis_tokens(&self) -> Vec<&T> {
        self.tokens_where(|kind| kind != EditKind::Delete)
    }

    fn tokens_where(&self, keep: impl Fn(EditKind) -> bool) -> Vec<&T> {
        self.ops
            .iter()
            .filter(|op| keep(op.kind))
            .flat_map(|op| op.run.iter())
            .collect()
    }
}
