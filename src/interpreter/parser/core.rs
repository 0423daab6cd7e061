use log::debug;

use crate::{
    ast::{ForNode, NodeId, NodeKind, Template},
    error::ParseError,
    interpreter::parser::{
        block::split_blocks,
        statement::{Statement, parse_statement},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a whole template into its node tree.
///
/// This is the entry point for template parsing. The template is split
/// into blocks, every expression block is parsed into a [`Statement`], and
/// the statements are assembled into nodes with a stack of open `if`/`for`
/// blocks.
///
/// # Parameters
/// - `source`: The template text, after macro expansion.
///
/// # Returns
/// The parsed [`Template`].
///
/// # Errors
/// Any syntax error. Nothing is returned for a partially valid template.
///
/// # Example
/// ```
/// use readson::interpreter::parser::core::parse_template;
///
/// let template = parse_template("$if ok$yes$else$no$end$").unwrap();
/// assert_eq!(template.len(), 3);
///
/// assert!(parse_template("$if ok$yes").is_err());
/// assert!(parse_template("$end$").is_err());
/// ```
pub fn parse_template(source: &str) -> ParseResult<Template> {
    let mut builder = TreeBuilder::new();

    for block in split_blocks(source)? {
        if !block.is_expression {
            builder.append(NodeKind::Text(block.text.to_string()));
            continue;
        }

        debug!("BLOCK: {}", block.text.trim());

        match parse_statement(block.text, block.line)? {
            Statement::Emit(element) => {
                builder.append(NodeKind::Access(element));
            },
            Statement::If(condition) => {
                let id = builder.append(NodeKind::If { condition,
                                                       then_branch: None,
                                                       else_branch: None });
                builder.open(id, OpenKind::If { in_else: false }, block.text, block.line);
            },
            Statement::For { item, index, target } => {
                let id = builder.append(NodeKind::For(ForNode { item,
                                                                index,
                                                                target,
                                                                body: None }));
                builder.open(id, OpenKind::For, block.text, block.line);
            },
            Statement::Else => builder.enter_else(block.line)?,
            Statement::End => builder.close(block.line)?,
        }
    }

    builder.finish()
}

/// The chain of siblings currently being built: its first node (stored in
/// the parent once the chain is complete) and its last node (where the next
/// sibling gets linked).
#[derive(Default)]
struct Chain {
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OpenKind {
    If { in_else: bool },
    For,
}

/// An `if` or `for` block whose `end` has not been seen yet.
struct OpenBlock {
    node:  NodeId,
    kind:  OpenKind,
    text:  String,
    line:  usize,
    chain: Chain,
}

/// Assembles statements into a [`Template`], keeping a stack of open
/// blocks. New nodes are appended to the innermost open chain.
struct TreeBuilder {
    template: Template,
    root:     Chain,
    stack:    Vec<OpenBlock>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self { template: Template::default(),
               root:     Chain::default(),
               stack:    Vec::new(), }
    }

    fn current_chain(&mut self) -> &mut Chain {
        match self.stack.last_mut() {
            Some(open) => &mut open.chain,
            None => &mut self.root,
        }
    }

    fn append(&mut self, kind: NodeKind) -> NodeId {
        let id = self.template.push(kind);
        let previous = {
            let chain = self.current_chain();
            let previous = chain.tail.replace(id);
            if chain.head.is_none() {
                chain.head = Some(id);
            }
            previous
        };
        if let Some(previous) = previous {
            self.template.link(previous, id);
        }
        id
    }

    fn open(&mut self, node: NodeId, kind: OpenKind, text: &str, line: usize) {
        self.stack.push(OpenBlock { node,
                                    kind,
                                    text: text.trim().to_string(),
                                    line,
                                    chain: Chain::default() });
    }

    /// Handles `else`: the chain built so far becomes the true branch and a
    /// fresh chain starts for the false branch.
    fn enter_else(&mut self, line: usize) -> ParseResult<()> {
        let Some(open) = self.stack.last_mut() else {
            return Err(ParseError::UnmatchedBlock { keyword: "else".to_string(),
                                                    line });
        };

        match open.kind {
            OpenKind::If { in_else: false } => {
                let then_head = std::mem::take(&mut open.chain).head;
                open.kind = OpenKind::If { in_else: true };
                let node = open.node;
                self.set_branch(node, then_head, false);
                Ok(())
            },
            OpenKind::If { in_else: true } | OpenKind::For => Err(ParseError::DuplicateElse { line }),
        }
    }

    /// Handles `end`: closes the innermost open block.
    fn close(&mut self, line: usize) -> ParseResult<()> {
        let Some(open) = self.stack.pop() else {
            return Err(ParseError::UnmatchedBlock { keyword: "end".to_string(),
                                                    line });
        };

        match open.kind {
            OpenKind::If { in_else } => self.set_branch(open.node, open.chain.head, in_else),
            OpenKind::For => {
                if let NodeKind::For(for_node) = &mut self.template.node_mut(open.node).kind {
                    for_node.body = open.chain.head;
                }
            },
        }

        Ok(())
    }

    fn set_branch(&mut self, node: NodeId, head: Option<NodeId>, is_else: bool) {
        if let NodeKind::If { then_branch,
                              else_branch,
                              .. } = &mut self.template.node_mut(node).kind
        {
            if is_else {
                *else_branch = head;
            } else {
                *then_branch = head;
            }
        }
    }

    fn finish(mut self) -> ParseResult<Template> {
        if let Some(open) = self.stack.pop() {
            return Err(ParseError::UnclosedBlock { text: open.text,
                                                   line: open.line, });
        }

        self.template.root = self.root.head;
        Ok(self.template)
    }
}
