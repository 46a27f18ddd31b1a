use crate::acceptance::{Acceptance, Item};
use crate::errors::ExError;
use datavet_core_types::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Accepted by either side
    Union,
    /// Accepted by both sides
    Intersection,
}

/// Two acceptances combined into one.
///
/// The side with the lower priority is asked first (the left side on a
/// tie) and the other side is only asked when the first answer does not
/// settle the result. Lifecycle hooks reach both sides. The combination's
/// own priority is the higher of the two.
pub struct CombinedAcceptance {
    left: Box<dyn Acceptance>,
    right: Box<dyn Acceptance>,
    op: Combinator,
    msg: Option<String>,
}

impl CombinedAcceptance {
    pub fn new(
        left: impl Acceptance + 'static,
        right: impl Acceptance + 'static,
        op: Combinator,
    ) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
            op,
            msg: None,
        }
    }

    pub fn union(left: impl Acceptance + 'static, right: impl Acceptance + 'static) -> Self {
        Self::new(left, right, Combinator::Union)
    }

    pub fn intersection(
        left: impl Acceptance + 'static,
        right: impl Acceptance + 'static,
    ) -> Self {
        Self::new(left, right, Combinator::Intersection)
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn combinator(&self) -> Combinator {
        self.op
    }
}

impl Acceptance for CombinedAcceptance {
    fn priority(&self) -> u32 {
        self.left.priority().max(self.right.priority())
    }

    fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    fn start_collection(&mut self) -> Result<(), ExError> {
        self.left.start_collection()?;
        self.right.start_collection()
    }

    fn start_group(&mut self, key: Option<&Value>) -> Result<(), ExError> {
        self.left.start_group(key)?;
        self.right.start_group(key)
    }

    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError> {
        let op = self.op;
        let (first, second) = if self.right.priority() < self.left.priority() {
            (&mut self.right, &mut self.left)
        } else {
            (&mut self.left, &mut self.right)
        };
        let settled = first.call_predicate(item)?;
        match (op, settled) {
            (Combinator::Union, true) => Ok(true),
            (Combinator::Intersection, false) => Ok(false),
            _ => second.call_predicate(item),
        }
    }

    fn end_group(&mut self, key: Option<&Value>) -> Result<(), ExError> {
        self.left.end_group(key)?;
        self.right.end_group(key)
    }

    fn end_collection(&mut self) -> Result<(), ExError> {
        self.left.end_collection()?;
        self.right.end_collection()
    }
}

impl fmt::Debug for CombinedAcceptance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedAcceptance")
            .field("op", &self.op)
            .field("priority", &self.priority())
            .field("msg", &self.msg)
            .finish_non_exhaustive()
    }
}
