use crate::{dictionary::{CompiledDictionary, Definition}, expr::Expr};
use once_cell::sync::Lazy;

static EMPTY: Lazy<CompiledDictionary> = Lazy::new(CompiledDictionary::new);

/// A frame of the lexical scope: a dictionary, the assumptions that hold in it, and the frame it
/// was pushed on.
///
/// Scopes are immutable. Pushing a dictionary returns a new frame that borrows its parent, so a
/// frame is popped simply by dropping it, on every exit path.
///
/// ```
/// use cas_symbolic::{dictionary::CompiledDictionary, engine::Scope};
///
/// let root = Scope::empty();
/// let local = CompiledDictionary::new();
/// {
///     let child = root.push(&local);
///     assert_eq!(child.depth(), 2);
/// }
/// assert_eq!(root.depth(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    dictionary: &'a CompiledDictionary,
    assumptions: &'a [Expr],
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    /// Creates a root scope over the given dictionary.
    pub fn root(dictionary: &'a CompiledDictionary) -> Self {
        Self { dictionary, assumptions: &[], parent: None }
    }

    /// Creates a root scope with no definitions.
    pub fn empty() -> Scope<'static> {
        Scope::root(&EMPTY)
    }

    /// Returns this frame with the given assumptions.
    pub fn with_assumptions(self, assumptions: &'a [Expr]) -> Self {
        Self { assumptions, ..self }
    }

    /// Pushes a frame for the given dictionary on top of this scope.
    pub fn push<'b>(&'b self, dictionary: &'b CompiledDictionary) -> Scope<'b> {
        Scope { dictionary, assumptions: &[], parent: Some(self) }
    }

    /// The dictionary of this frame.
    pub fn dictionary(&self) -> &'a CompiledDictionary {
        self.dictionary
    }

    /// The assumptions of this frame.
    pub fn assumptions(&self) -> &'a [Expr] {
        self.assumptions
    }

    /// The frame this frame was pushed on.
    pub fn parent(&self) -> Option<&'a Scope<'a>> {
        self.parent
    }

    /// The number of frames in this scope, including this one.
    pub fn depth(&self) -> usize {
        self.frames().count()
    }

    /// Iterates over the frames of this scope, innermost first.
    pub fn frames(&self) -> impl Iterator<Item = Scope<'a>> {
        std::iter::successors(Some(*self), |scope| scope.parent.copied())
    }

    /// Finds the definition with the given name, searching from the innermost frame outward.
    pub fn lookup(&self, name: &str) -> Option<&'a Definition> {
        self.frames().find_map(|scope| scope.dictionary.get(name))
    }
}
