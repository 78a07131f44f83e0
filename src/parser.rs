//! Recursive-descent parsers for the two rule grammars: remap rules and
//! parameter rules. Both run over a [`Lookahead2`] built from `analyze`.
//!
//! ```text
//! Rule         := [ Token ':' ]? ( NodeRepl | NsRepl | NameRemap )
//! NodeRepl     := '__node' ':=' Token                       Eof
//! NsRepl       := '__ns'   ':=' '/' { Token '/' }* [Token]  Eof
//! NameRemap    := [ 'rostopic://' | 'rosservice://' ]?
//!                  MatchName ':=' ReplName                  Eof
//! MatchName    := [ '~/' | '/' ]? Token { '/' Token }*
//! ReplName     := [ '~/' | '/' ]? ReplTok { '/' ReplTok }*
//! ReplTok      := Token                         ; backrefs reserved
//!
//! ParamRule    := [ Token ':' ]? DottedName ':=' RemainingText
//! DottedName   := Token { '.' Token }*
//! ```

use smol_str::SmolStr;

use crate::error::{Error, Result};
use crate::lexer::{Lexeme, Tag};
use crate::lookahead::Lookahead2;
use crate::remap::{RemapRule, RemapRuleKind, RemapScope};

/// Parses a single remap rule, as it would appear after `-r` or in the
/// deprecated inline `name:=replacement` form.
pub fn parse_remap_rule(text: &str) -> Result<RemapRule> {
    let mut la = Lookahead2::new(text);
    let scope = parse_optional_scope(&mut la)?;
    let rule = match la.peek() {
        Tag::Node => parse_node_repl(&mut la, text, scope)?,
        Tag::Ns => parse_ns_repl(&mut la, text, scope)?,
        _ => parse_name_remap(&mut la, text, scope)?,
    };
    expect_remap_eof(&mut la)?;
    Ok(rule)
}

fn parse_optional_scope(la: &mut Lookahead2) -> Result<RemapScope> {
    if la.peek2() == (Tag::Token, Tag::Colon) {
        let (name, _) = la.accept();
        let scope = RemapScope::Node(SmolStr::new(name));
        la.accept();
        Ok(scope)
    } else {
        Ok(RemapScope::AnyNode)
    }
}

fn parse_node_repl(la: &mut Lookahead2, _text: &str, scope: RemapScope) -> Result<RemapRule> {
    expect_remap(la, Tag::Node)?;
    expect_remap(la, Tag::Separator)?;
    let (repl, _) = expect_remap(la, Tag::Token)?;
    Ok(RemapRule { scope, kind: RemapRuleKind::NodeName, pattern: None, replacement: repl.to_string() })
}

fn parse_ns_repl(la: &mut Lookahead2, text: &str, scope: RemapScope) -> Result<RemapRule> {
    expect_remap(la, Tag::Ns)?;
    expect_remap(la, Tag::Separator)?;
    let start = la.cursor();
    expect_remap(la, Tag::ForwardSlash)?;
    loop {
        match la.peek() {
            Tag::Token | Tag::WildOne | Tag::WildMulti => {
                la.accept();
                if la.peek() == Tag::ForwardSlash {
                    la.accept();
                } else {
                    break;
                }
            }
            _ => break,
        }
    }
    let end = la.cursor();
    Ok(RemapRule {
        scope,
        kind: RemapRuleKind::Namespace,
        pattern: None,
        replacement: text[start..end].to_string(),
    })
}

fn parse_name_remap(la: &mut Lookahead2, text: &str, scope: RemapScope) -> Result<RemapRule> {
    let kind = match la.peek() {
        Tag::UrlTopic => {
            la.accept();
            RemapRuleKind::Topic
        }
        Tag::UrlService => {
            la.accept();
            RemapRuleKind::Service
        }
        _ => RemapRuleKind::TopicOrService,
    };

    let match_start = la.cursor();
    parse_name_path(la)?;
    let pattern = text[match_start..la.cursor()].to_string();

    expect_remap(la, Tag::Separator)?;

    let repl_start = la.cursor();
    parse_name_path(la)?;
    let replacement = text[repl_start..la.cursor()].to_string();

    Ok(RemapRule { scope, kind, pattern: Some(pattern), replacement })
}

fn parse_name_path(la: &mut Lookahead2) -> Result<()> {
    if matches!(la.peek(), Tag::TildeSlash | Tag::ForwardSlash) {
        la.accept();
    }
    accept_name_segment(la)?;
    while la.peek() == Tag::ForwardSlash {
        la.accept();
        accept_name_segment(la)?;
    }
    Ok(())
}

fn accept_name_segment(la: &mut Lookahead2) -> Result<()> {
    let lex = la.peek_full();
    match lex.tag {
        Tag::Token | Tag::WildOne | Tag::WildMulti => {
            la.accept();
            Ok(())
        }
        Tag::BackRef(_) => Err(Error::NotImplemented("backreferences in remap rules")),
        found => Err(Error::InvalidRemapRule {
            index: lex.start,
            message: format!("expected a name segment, found {found:?}"),
        }),
    }
}

fn expect_remap<'s>(la: &mut Lookahead2<'s>, tag: Tag) -> Result<(&'s str, Lexeme)> {
    la.expect(tag).map_err(|e| Error::InvalidRemapRule {
        index: e.at,
        message: format!("expected {:?}, found {:?}", e.expected, e.found),
    })
}

fn expect_remap_eof(la: &mut Lookahead2) -> Result<()> {
    let lex = la.peek_full();
    if lex.tag == Tag::Eof {
        Ok(())
    } else {
        Err(Error::InvalidRemapRule { index: lex.start, message: format!("unexpected trailing {:?}", lex.tag) })
    }
}

/// The three pieces of a parsed `-p` parameter rule: which node(s) it
/// applies to (`*` when no prefix was given), the dotted parameter path, and
/// the raw, unparsed value text following `:=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamRuleParts {
    pub node_glob: String,
    pub parameter_path: String,
    pub remaining: String,
}

/// Parses a parameter rule's node-glob prefix and dotted path, leaving the
/// value text after `:=` unlexed for the YAML scalar parser.
pub fn parse_param_rule(text: &str) -> Result<ParamRuleParts> {
    let mut la = Lookahead2::new(text);

    let node_glob = if la.peek2() == (Tag::Token, Tag::Colon) {
        let (name, _) = la.accept();
        let name = name.to_string();
        la.accept();
        name
    } else {
        "/**".to_string()
    };

    let path_start = la.cursor();
    expect_param(&mut la, Tag::Token)?;
    while la.peek() == Tag::Dot {
        la.accept();
        expect_param(&mut la, Tag::Token)?;
    }
    let parameter_path = text[path_start..la.cursor()].to_string();

    expect_param(&mut la, Tag::Separator)?;
    let remaining = text[la.cursor()..].to_string();

    Ok(ParamRuleParts { node_glob, parameter_path, remaining })
}

fn expect_param<'s>(la: &mut Lookahead2<'s>, tag: Tag) -> Result<(&'s str, Lexeme)> {
    la.expect(tag).map_err(|e| Error::InvalidParamRule {
        index: e.at,
        message: format!("expected {:?}, found {:?}", e.expected, e.found),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_name_replacement() {
        let rule = parse_remap_rule("__node:=new_name").unwrap();
        assert_eq!(rule.kind, RemapRuleKind::NodeName);
        assert_eq!(rule.replacement, "new_name");
        assert_eq!(rule.scope, RemapScope::AnyNode);
    }

    #[test]
    fn namespace_replacement_scoped_to_node() {
        let rule = parse_remap_rule("Node1:__ns:=/a").unwrap();
        assert_eq!(rule.kind, RemapRuleKind::Namespace);
        assert_eq!(rule.replacement, "/a");
        assert_eq!(rule.scope, RemapScope::Node(SmolStr::new("Node1")));
    }

    #[test]
    fn bare_topic_or_service_remap() {
        let rule = parse_remap_rule("chatter:=new_chatter").unwrap();
        assert_eq!(rule.kind, RemapRuleKind::TopicOrService);
        assert_eq!(rule.pattern.as_deref(), Some("chatter"));
        assert_eq!(rule.replacement, "new_chatter");
    }

    #[test]
    fn url_prefixed_topic_remap() {
        let rule = parse_remap_rule("rostopic://chatter:=/new_chatter").unwrap();
        assert_eq!(rule.kind, RemapRuleKind::Topic);
        assert_eq!(rule.replacement, "/new_chatter");
    }

    #[test]
    fn relative_path_with_multiple_segments() {
        let rule = parse_remap_rule("/foo/bar:=/baz/qux").unwrap();
        assert_eq!(rule.pattern.as_deref(), Some("/foo/bar"));
        assert_eq!(rule.replacement, "/baz/qux");
    }

    #[test]
    fn backreference_in_replacement_is_not_implemented() {
        let err = parse_remap_rule(r"/foo/*:=/bar/\1").unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = parse_remap_rule("foo:=bar extra").unwrap_err();
        assert!(matches!(err, Error::InvalidRemapRule { .. }));
    }

    #[test]
    fn param_rule_without_node_prefix_defaults_to_wildcard() {
        let parts = parse_param_rule("use_sim_time:=true").unwrap();
        assert_eq!(parts.node_glob, "/**");
        assert_eq!(parts.parameter_path, "use_sim_time");
        assert_eq!(parts.remaining, "true");
    }

    #[test]
    fn param_rule_with_node_prefix_and_dotted_path() {
        let parts = parse_param_rule("my_node:group.value:=[1, 2, 3]").unwrap();
        assert_eq!(parts.node_glob, "my_node");
        assert_eq!(parts.parameter_path, "group.value");
        assert_eq!(parts.remaining, "[1, 2, 3]");
    }
}
