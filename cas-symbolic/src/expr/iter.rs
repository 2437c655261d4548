use super::Expr;

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first).
///
/// The children of a function call are its head followed by its arguments; the children of a
/// dictionary are its values, in key order.
///
/// This iterator is created by [`Expr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a Expr>,
    last_visited: Option<&'a Expr>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a Expr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a Expr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression matches the last visited expression.
    fn is_last_visited(&self, expr: &'a Expr) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, expr),
            None => false,
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            match expr {
                Expr::Number(_) | Expr::String(_) | Expr::Symbol(_) => return self.visit(),
                Expr::Dictionary(entries) => {
                    match entries.values().last() {
                        Some(last) if !self.is_last_visited(last) => {
                            for value in entries.values().rev() {
                                self.stack.push(value);
                            }
                        },
                        _ => return self.visit(),
                    }
                },
                Expr::Call(head, args) => {
                    let last = args.last().unwrap_or(&**head);
                    if self.is_last_visited(last) {
                        return self.visit();
                    }
                    for arg in args.iter().rev() {
                        self.stack.push(arg);
                    }
                    self.stack.push(&**head);
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn post_order() {
        let expr = Expr::function("Add", vec![
            Expr::Number(1.0),
            Expr::function("Negate", vec![Expr::symbol("x")]),
            Expr::Dictionary(IndexMap::from([("k".to_string(), Expr::string("v"))])),
        ]);
        let visited = expr.post_order_iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>();
        assert_eq!(visited, vec![
            "Add",
            "1",
            "Negate",
            "x",
            "Negate(x)",
            "'v'",
            "{k: 'v'}",
            "Add(1, Negate(x), {k: 'v'})",
        ]);
    }

    #[test]
    fn empty_containers() {
        let expr = Expr::function("List", vec![Expr::Dictionary(IndexMap::new())]);
        let visited = expr.post_order_iter().count();
        assert_eq!(visited, 3);
    }
}
