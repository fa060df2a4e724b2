use jackdaw_vm::instruction::Segment;

use rustc_hash::FxHashMap;

/// Storage kind of a declared variable.
///
/// The declaration keyword `field` is stored as `This` because that is
/// the segment used to address it; the mapping is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Static,
    This,
    Argument,
    Local,
}

impl Kind {
    /// Kind under which a class-variable declaration keyword is stored.
    pub fn from_declaration(keyword: &str) -> Option<Kind> {
        match keyword {
            "static" => Some(Kind::Static),
            "field" => Some(Kind::This),
            _ => None,
        }
    }

    pub fn segment(self) -> Segment {
        match self {
            Kind::Static => Segment::Static,
            Kind::This => Segment::This,
            Kind::Argument => Segment::Argument,
            Kind::Local => Segment::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub ty: String,
    pub kind: Kind,
    pub index: usize,
}

#[derive(Default)]
struct Scope {
    symbols: FxHashMap<String, Symbol>,
    counters: FxHashMap<Kind, usize>,
}

/// Stack of scopes: the bottom one is the class scope (`static` and
/// `this` kinds), with at most one subroutine scope (`argument` and
/// `local`) above it.
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable {
            scopes: vec![Scope::default()],
        }
    }

    pub fn begin_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Defines a symbol in the innermost scope, assigning the next index
    /// of its kind there. Redefining a name overwrites the old entry.
    pub fn define(&mut self, name: &str, ty: &str, kind: Kind) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        let counter = scope.counters.entry(kind).or_default();
        let symbol = Symbol {
            name: name.to_owned(),
            ty: ty.to_owned(),
            kind,
            index: *counter,
        };
        *counter += 1;

        scope.symbols.insert(symbol.name.clone(), symbol);
    }

    /// Walks the scopes innermost-first; the first match wins.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
    }

    /// Number of symbols of `kind` summed across all live scopes. Each
    /// kind only ever lives in one scope, so this is that scope's count.
    pub fn var_count(&self, kind: Kind) -> usize {
        self.scopes
            .iter()
            .map(|scope| scope.counters.get(&kind).copied().unwrap_or(0))
            .sum()
    }
}

impl Default for SymbolTable {
    fn default() -> SymbolTable {
        SymbolTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_stored_as_this() {
        assert_eq!(Kind::from_declaration("field"), Some(Kind::This));
        assert_eq!(Kind::from_declaration("static"), Some(Kind::Static));
        assert_eq!(Kind::from_declaration("var"), None);
    }

    #[test]
    fn indices_are_per_kind() {
        let mut table = SymbolTable::new();
        table.define("a", "int", Kind::Static);
        table.define("b", "int", Kind::This);
        table.define("c", "int", Kind::This);

        assert_eq!(table.lookup("a").map(|s| s.index), Some(0));
        assert_eq!(table.lookup("b").map(|s| s.index), Some(0));
        assert_eq!(table.lookup("c").map(|s| s.index), Some(1));
        assert_eq!(table.var_count(Kind::This), 2);
        assert_eq!(table.var_count(Kind::Static), 1);
    }

    #[test]
    fn subroutine_scope_shadows_class_scope() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::This);

        table.begin_scope();
        table.define("x", "boolean", Kind::Local);

        let symbol = table.lookup("x").unwrap();
        assert_eq!(symbol.kind, Kind::Local);
        assert_eq!(symbol.ty, "boolean");

        table.end_scope();

        let symbol = table.lookup("x").unwrap();
        assert_eq!(symbol.kind, Kind::This);
    }

    #[test]
    fn end_scope_resets_subroutine_counts() {
        let mut table = SymbolTable::new();
        table.define("f", "int", Kind::This);

        table.begin_scope();
        table.define("a", "int", Kind::Argument);
        table.define("v", "int", Kind::Local);
        assert_eq!(table.var_count(Kind::Argument), 1);
        assert_eq!(table.var_count(Kind::Local), 1);

        table.end_scope();
        assert_eq!(table.var_count(Kind::Argument), 0);
        assert_eq!(table.var_count(Kind::Local), 0);
        assert_eq!(table.var_count(Kind::This), 1);
        assert!(table.lookup("f").is_some());
        assert!(table.lookup("v").is_none());
    }

    #[test]
    fn redefinition_overwrites_and_advances_the_counter() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Static);
        table.define("x", "char", Kind::Static);

        let symbol = table.lookup("x").unwrap();
        assert_eq!(symbol.ty, "char");
        assert_eq!(symbol.index, 1);
        assert_eq!(table.var_count(Kind::Static), 2);
    }

    #[test]
    fn kinds_map_to_their_segments() {
        use jackdaw_vm::instruction::Segment;

        assert_eq!(Kind::Static.segment(), Segment::Static);
        assert_eq!(Kind::This.segment(), Segment::This);
        assert_eq!(Kind::Argument.segment(), Segment::Argument);
        assert_eq!(Kind::Local.segment(), Segment::Local);
    }
}
