//! Lowering of pest pairs into a syntax tree
//!
//! Rules named after a node kind become named nodes, `kw_*` and `dir_*`
//! tokens become anonymous nodes and `#tags` become field names. Expressions
//! are flat in the grammar; their structure is recovered here with a Pratt
//! parser.

use once_cell::sync::Lazy;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};

use super::grammar::Rule;
use super::ParserOptions;
use crate::error::{PplError, Result};
use crate::language::Language;
use crate::tree::{NodeData, Point};

/// Binding power, lowest first.
static PRATT: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    PrattParser::new()
        .op(Op::infix(Rule::op_or, Assoc::Left))
        .op(Op::infix(Rule::op_and, Assoc::Left))
        .op(Op::infix(Rule::op_bit_or, Assoc::Left))
        .op(Op::infix(Rule::op_bit_and, Assoc::Left))
        .op(Op::infix(Rule::op_eq, Assoc::Left))
        .op(Op::infix(Rule::op_cmp, Assoc::Left))
        .op(Op::infix(Rule::op_add, Assoc::Left))
        .op(Op::infix(Rule::op_mul, Assoc::Left))
        .op(Op::infix(Rule::op_pow, Assoc::Left))
        .op(Op::prefix(Rule::op_not) | Op::prefix(Rule::op_neg) | Op::prefix(Rule::op_pos))
        .op(Op::postfix(Rule::member_access) | Op::postfix(Rule::index_access))
});

/// How a rule shows up in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// Named node with children.
    Node(&'static str),
    /// Named node without children.
    Leaf(&'static str),
    /// Anonymous keyword or directive token.
    Token,
    /// Supertype: children are hoisted into the parent.
    Transparent,
    /// Flat operand/operator run to be restructured by precedence.
    Expression,
    Skip,
}

fn shape(rule: Rule) -> Shape {
    use Shape::*;

    match rule {
        Rule::source_file => Node("source_file"),
        Rule::preprocessor_section => Node("preprocessor_section"),
        Rule::define_directive => Node("define_directive"),
        Rule::undef_directive => Node("undef_directive"),
        Rule::include_directive => Node("include_directive"),
        Rule::if_directive => Node("if_directive"),
        Rule::elif_directive => Node("elif_directive"),
        Rule::else_directive => Node("else_directive"),
        Rule::endif_directive => Node("endif_directive"),
        Rule::version_directive => Node("version_directive"),
        Rule::function_declaration => Node("function_declaration"),
        Rule::procedure_declaration => Node("procedure_declaration"),
        Rule::function_implementation => Node("function_implementation"),
        Rule::procedure_implementation => Node("procedure_implementation"),
        Rule::parameter_list => Node("parameter_list"),
        Rule::parameter => Node("parameter"),
        Rule::variable_declaration => Node("variable_declaration"),
        Rule::array_dimensions => Node("array_dimensions"),
        Rule::expression_statement => Node("expression_statement"),
        Rule::let_statement => Node("let_statement"),
        Rule::if_single_line_statement => Node("if_single_line_statement"),
        Rule::if_block_statement => Node("if_block_statement"),
        Rule::elseif_block => Node("elseif_block"),
        Rule::else_block => Node("else_block"),
        Rule::select_statement => Node("select_statement"),
        Rule::case_block => Node("case_block"),
        Rule::case_specifier_list => Node("case_specifier_list"),
        Rule::case_specifier => Node("case_specifier"),
        Rule::default_block => Node("default_block"),
        Rule::while_single_line_statement => Node("while_single_line_statement"),
        Rule::while_block_statement => Node("while_block_statement"),
        Rule::repeat_until_statement => Node("repeat_until_statement"),
        Rule::loop_block_statement => Node("loop_block_statement"),
        Rule::for_block_statement => Node("for_block_statement"),
        Rule::goto_statement => Node("goto_statement"),
        Rule::gosub_statement => Node("gosub_statement"),
        Rule::return_statement => Node("return_statement"),
        Rule::break_statement => Node("break_statement"),
        Rule::continue_statement => Node("continue_statement"),
        Rule::end_statement => Node("end_statement"),
        Rule::stop_statement => Node("stop_statement"),
        Rule::block_statement => Node("block_statement"),
        Rule::predefined_call => Node("predefined_call"),
        Rule::procedure_call => Node("procedure_call"),
        Rule::parenthesized_args => Node("parenthesized_args"),
        Rule::bare_args => Node("bare_args"),
        Rule::argument_sequence => Node("argument_sequence"),
        Rule::call_expression => Node("call_expression"),
        Rule::parens_expression => Node("parens_expression"),
        Rule::label => Node("label"),

        Rule::comment | Rule::legacy_comment => Leaf("comment"),
        Rule::type_name => Leaf("type"),
        Rule::builtin_statement => Leaf("builtin_statement"),
        Rule::builtin_function => Leaf("builtin_function"),
        Rule::string_literal => Leaf("string_literal"),
        Rule::int_number => Leaf("int_number"),
        Rule::float_number => Leaf("float_number"),
        Rule::hex_number => Leaf("hex_number"),
        Rule::boolean_literal => Leaf("boolean_literal"),
        Rule::at_color_code => Leaf("at_color_code"),
        Rule::identifier => Leaf("identifier"),
        Rule::assign_op
        | Rule::op_or
        | Rule::op_and
        | Rule::op_bit_or
        | Rule::op_bit_and
        | Rule::op_eq
        | Rule::op_cmp
        | Rule::op_add
        | Rule::op_pow
        | Rule::op_mul
        | Rule::op_not
        | Rule::op_neg
        | Rule::op_pos => Leaf("operator"),

        Rule::kw_begin
        | Rule::kw_break
        | Rule::kw_case
        | Rule::kw_continue
        | Rule::kw_declare
        | Rule::kw_default
        | Rule::kw_do
        | Rule::kw_else
        | Rule::kw_elseif
        | Rule::kw_end
        | Rule::kw_endfor
        | Rule::kw_endfunc
        | Rule::kw_endif
        | Rule::kw_endloop
        | Rule::kw_endproc
        | Rule::kw_endselect
        | Rule::kw_endwhile
        | Rule::kw_for
        | Rule::kw_function
        | Rule::kw_gosub
        | Rule::kw_goto
        | Rule::kw_if
        | Rule::kw_let
        | Rule::kw_loop
        | Rule::kw_next
        | Rule::kw_not
        | Rule::kw_procedure
        | Rule::kw_repeat
        | Rule::kw_return
        | Rule::kw_select
        | Rule::kw_step
        | Rule::kw_stop
        | Rule::kw_then
        | Rule::kw_to
        | Rule::kw_until
        | Rule::kw_var
        | Rule::kw_while
        | Rule::dir_define
        | Rule::dir_undef
        | Rule::dir_include
        | Rule::dir_if
        | Rule::dir_elif
        | Rule::dir_else
        | Rule::dir_endif
        | Rule::dir_version => Token,

        Rule::statement => Transparent,
        Rule::expression | Rule::lvalue => Expression,

        _ => Skip,
    }
}

/// An expression after precedence climbing, still borrowing its pairs.
enum Expr<'i> {
    Primary(Pair<'i, Rule>),
    Prefix(Pair<'i, Rule>, Box<Expr<'i>>),
    Postfix(Box<Expr<'i>>, Pair<'i, Rule>),
    Infix(Box<Expr<'i>>, Pair<'i, Rule>, Box<Expr<'i>>),
}

fn climb(pairs: Pairs<'_, Rule>) -> Expr<'_> {
    PRATT
        .map_primary(Expr::Primary)
        .map_prefix(|op, operand| Expr::Prefix(op, Box::new(operand)))
        .map_postfix(|operand, op| Expr::Postfix(Box::new(operand), op))
        .map_infix(|left, op, right| Expr::Infix(Box::new(left), op, Box::new(right)))
        .parse(pairs)
}

/// Byte offset to row/column conversion.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex { starts }
    }

    fn point(&self, byte: usize) -> Point {
        let row = match self.starts.binary_search(&byte) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        Point::new(row, byte - self.starts[row])
    }
}

pub(crate) struct TreeBuilder<'a> {
    language: &'a Language,
    lines: LineIndex,
    keep_comments: bool,
    nodes: Vec<NodeData>,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(language: &'a Language, source: &str, options: &ParserOptions) -> Self {
        TreeBuilder {
            language,
            lines: LineIndex::new(source),
            keep_comments: options.keep_comments,
            nodes: Vec::new(),
        }
    }

    /// Lower the `source_file` pair. The root ends up at index 0.
    pub(crate) fn build(mut self, root: Pair<'_, Rule>) -> Result<Vec<NodeData>> {
        if root.as_rule() != Rule::source_file {
            return Err(PplError::UnknownNodeKind(format!("{:?}", root.as_rule())));
        }
        self.lower(root, None, None)?;
        Ok(self.nodes)
    }

    fn lower(
        &mut self,
        pair: Pair<'_, Rule>,
        parent: Option<usize>,
        inherited: Option<u16>,
    ) -> Result<Option<usize>> {
        let field = match pair.as_node_tag() {
            Some(tag) => Some(self.field_id(tag)?),
            None => inherited,
        };

        match shape(pair.as_rule()) {
            Shape::Skip => Ok(None),
            Shape::Transparent => {
                let mut last = None;
                for child in pair.into_inner() {
                    if let Some(id) = self.lower(child, parent, field)? {
                        last = Some(id);
                    }
                }
                Ok(last)
            }
            Shape::Expression => {
                let expr = climb(pair.into_inner());
                self.lower_expr(expr, parent, field).map(Some)
            }
            Shape::Token => {
                let kind = self.anonymous_kind(pair.as_str())?;
                let span = pair.as_span();
                Ok(Some(self.push(kind, false, false, field, span.start(), span.end(), parent)))
            }
            Shape::Leaf(name) => {
                let is_comment = name == "comment";
                if is_comment && !self.keep_comments {
                    return Ok(None);
                }
                let kind = self.named_kind(name)?;
                let span = pair.as_span();
                Ok(Some(self.push(kind, true, is_comment, field, span.start(), span.end(), parent)))
            }
            Shape::Node(name) => {
                let kind = self.named_kind(name)?;
                let span = pair.as_span();
                let id = self.push(kind, true, false, field, span.start(), span.end(), parent);
                for child in pair.into_inner() {
                    self.lower(child, Some(id), None)?;
                }
                Ok(Some(id))
            }
        }
    }

    fn lower_expr(&mut self, expr: Expr<'_>, parent: Option<usize>, field: Option<u16>) -> Result<usize> {
        match expr {
            Expr::Primary(pair) => {
                let rule = pair.as_rule();
                self.lower(pair, parent, field)?
                    .ok_or_else(|| PplError::UnknownNodeKind(format!("{:?}", rule)))
            }
            Expr::Prefix(op, operand) => {
                let start = op.as_span().start();
                let id = self.open("unary_expression", parent, field)?;
                self.operator(op, id)?;
                let operand_field = self.field_id("operand")?;
                let operand = self.lower_expr(*operand, Some(id), Some(operand_field))?;
                let end = self.nodes[operand].end_byte;
                self.close(id, start, end);
                Ok(id)
            }
            Expr::Infix(left, op, right) => {
                let id = self.open("binary_expression", parent, field)?;
                let left_field = self.field_id("left")?;
                let left = self.lower_expr(*left, Some(id), Some(left_field))?;
                self.operator(op, id)?;
                let right_field = self.field_id("right")?;
                let right = self.lower_expr(*right, Some(id), Some(right_field))?;
                let (start, end) = (self.nodes[left].start_byte, self.nodes[right].end_byte);
                self.close(id, start, end);
                Ok(id)
            }
            Expr::Postfix(operand, op) => {
                let (kind, operand_field) = match op.as_rule() {
                    Rule::member_access => ("member_reference", "object"),
                    Rule::index_access => ("index_expression", "array"),
                    other => return Err(PplError::UnknownNodeKind(format!("{:?}", other))),
                };
                let end = op.as_span().end();
                let id = self.open(kind, parent, field)?;
                let operand_field = self.field_id(operand_field)?;
                let operand = self.lower_expr(*operand, Some(id), Some(operand_field))?;
                for child in op.into_inner() {
                    self.lower(child, Some(id), None)?;
                }
                let start = self.nodes[operand].start_byte;
                self.close(id, start, end);
                Ok(id)
            }
        }
    }

    fn operator(&mut self, op: Pair<'_, Rule>, parent: usize) -> Result<usize> {
        let kind = self.named_kind("operator")?;
        let field = self.field_id("operator")?;
        let span = op.as_span();
        Ok(self.push(kind, true, false, Some(field), span.start(), span.end(), Some(parent)))
    }

    /// Add a node whose span is only known once its children are in place.
    fn open(&mut self, kind: &str, parent: Option<usize>, field: Option<u16>) -> Result<usize> {
        let kind = self.named_kind(kind)?;
        Ok(self.push(kind, true, false, field, 0, 0, parent))
    }

    fn close(&mut self, id: usize, start: usize, end: usize) {
        let (start_point, end_point) = (self.lines.point(start), self.lines.point(end));
        let node = &mut self.nodes[id];
        node.start_byte = start;
        node.end_byte = end;
        node.start = start_point;
        node.end = end_point;
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        kind_id: u16,
        named: bool,
        extra: bool,
        field_id: Option<u16>,
        start_byte: usize,
        end_byte: usize,
        parent: Option<usize>,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(NodeData {
            kind_id,
            named,
            extra,
            field_id,
            start_byte,
            end_byte,
            start: self.lines.point(start_byte),
            end: self.lines.point(end_byte),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    fn named_kind(&self, kind: &str) -> Result<u16> {
        self.language
            .id_for_node_kind(kind, true)
            .ok_or_else(|| PplError::UnknownNodeKind(kind.to_string()))
    }

    fn anonymous_kind(&self, text: &str) -> Result<u16> {
        self.language
            .id_for_node_kind(text, false)
            .ok_or_else(|| PplError::UnknownNodeKind(text.to_string()))
    }

    fn field_id(&self, name: &str) -> Result<u16> {
        self.language
            .field_id_for_name(name)
            .ok_or_else(|| PplError::UnknownField(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index() {
        let lines = LineIndex::new("ab\ncd\n\nx");
        assert_eq!(lines.point(0), Point::new(0, 0));
        assert_eq!(lines.point(2), Point::new(0, 2));
        assert_eq!(lines.point(3), Point::new(1, 0));
        assert_eq!(lines.point(7), Point::new(3, 0));
        assert_eq!(lines.point(8), Point::new(3, 1));
    }

    #[test]
    fn test_every_named_shape_is_a_language_kind() {
        let language = crate::language::language().unwrap();
        let rules = [
            Rule::source_file,
            Rule::let_statement,
            Rule::comment,
            Rule::legacy_comment,
            Rule::type_name,
            Rule::op_add,
            Rule::assign_op,
            Rule::label,
        ];
        for rule in rules {
            match shape(rule) {
                Shape::Node(kind) | Shape::Leaf(kind) => {
                    assert!(language.id_for_node_kind(kind, true).is_some(), "{}", kind)
                }
                other => panic!("unexpected shape {:?} for {:?}", other, rule),
            }
        }
    }

    #[test]
    fn test_supertype_rules_are_transparent() {
        assert_eq!(shape(Rule::statement), Shape::Transparent);
        assert_eq!(shape(Rule::expression), Shape::Expression);
        assert_eq!(shape(Rule::EOI), Shape::Skip);
    }
}
