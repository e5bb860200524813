//! Pest grammar parser for PPL

use pest::error::{Error, ErrorVariant, LineColLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::error::{PplError, Result};

#[derive(Parser)]
#[grammar = "../grammar/ppl.pest"]
pub struct PplParser;

/// Run the grammar over a whole source file and return the `source_file` pair.
pub fn parse_source_file(input: &str) -> Result<Pair<'_, Rule>> {
    let mut pairs = PplParser::parse(Rule::source_file, input).map_err(syntax_error)?;

    pairs.next().ok_or_else(|| PplError::Parse {
        line: 1,
        column: 1,
        message: "Empty input".to_string(),
    })
}

fn syntax_error(err: Error<Rule>) -> PplError {
    let (line, column) = match err.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };
    let message = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => expected_message(&positives, &negatives),
        ErrorVariant::CustomError { message } => message,
    };

    PplError::Parse {
        line,
        column,
        message,
    }
}

/// Build "unexpected ...; expected ..." from the rules pest tried at the
/// failure position. Each tree name is listed once.
fn expected_message(positives: &[Rule], negatives: &[Rule]) -> String {
    let expected = describe_rules(positives);
    let unexpected = describe_rules(negatives);

    match (unexpected.is_empty(), expected.is_empty()) {
        (false, false) => format!(
            "unexpected {}; expected {}",
            enumerate(&unexpected),
            enumerate(&expected)
        ),
        (false, true) => format!("unexpected {}", enumerate(&unexpected)),
        (true, false) => format!("expected {}", enumerate(&expected)),
        (true, true) => "unknown parsing error".to_string(),
    }
}

fn describe_rules(rules: &[Rule]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(rules.len());
    for rule in rules {
        let name = describe_rule(rule);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn enumerate(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{} or {}", first, second),
        [rest @ .., last] => format!("{}, or {}", rest.join(", "), last),
    }
}

/// Name a rule the way it shows up in a syntax tree, for error messages.
pub(crate) fn describe_rule(rule: &Rule) -> String {
    match rule {
        Rule::EOI => "end of input".to_string(),
        Rule::type_name => "type".to_string(),
        Rule::legacy_comment => "comment".to_string(),
        Rule::assign_op => "assignment operator".to_string(),
        Rule::dir_version => ";#".to_string(),
        Rule::member_access => ".".to_string(),
        Rule::index_access => "(".to_string(),
        _ => {
            let name = format!("{:?}", rule);
            if let Some(keyword) = name.strip_prefix("kw_") {
                keyword.to_ascii_uppercase()
            } else if let Some(directive) = name.strip_prefix("dir_") {
                format!(";${}", directive.to_ascii_uppercase())
            } else if name.starts_with("op_") {
                "operator".to_string()
            } else {
                name
            }
        }
    }
}
