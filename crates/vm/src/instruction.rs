use derive_more::Display;

/// Memory segments addressable by push and pop.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    #[display(fmt = "constant")]
    Constant,
    #[display(fmt = "argument")]
    Argument,
    #[display(fmt = "local")]
    Local,
    #[display(fmt = "static")]
    Static,
    #[display(fmt = "this")]
    This,
    #[display(fmt = "that")]
    That,
    #[display(fmt = "pointer")]
    Pointer,
    #[display(fmt = "temp")]
    Temp,
}

/// Arithmetic and logic commands of the target machine.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    #[display(fmt = "add")]
    Add,
    #[display(fmt = "sub")]
    Sub,
    #[display(fmt = "neg")]
    Neg,
    #[display(fmt = "and")]
    And,
    #[display(fmt = "or")]
    Or,
    #[display(fmt = "not")]
    Not,
    #[display(fmt = "eq")]
    Eq,
    #[display(fmt = "lt")]
    Lt,
    #[display(fmt = "gt")]
    Gt,
}
