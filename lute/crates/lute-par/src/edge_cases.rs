//! Edge case tests for lute-par.

#[cfg(test)]
mod tests {
    use lute_lex::{tokenize, KeywordTable};
    use lute_util::{ErrorKind, LuteResult};

    use crate::{parse, Node};

    fn parse_src(source: &str) -> LuteResult<Node> {
        let tokens = tokenize("edge.lute", source, &KeywordTable::default())?;
        parse(tokens)
    }

    fn json(source: &str) -> serde_json::Value {
        parse_src(source).unwrap().to_json()
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_function_with_defaults() {
        let program = json("fn greet(name, greeting = \"hi\") { greeting }");
        let def = &program["statements"][0];
        assert_eq!(def["type"], "FuncDef");
        assert_eq!(def["anonymous"], false);
        assert_eq!(def["params"]["args"][0]["name"], "name");
        assert_eq!(def["params"]["named"][0]["greeting"]["value"], "hi");
    }

    #[test]
    fn test_edge_anonymous_function_expression() {
        let program = json("apply(fn (x) { return x })");
        let arg = &program["statements"][0]["args"]["args"][0];
        assert_eq!(arg["type"], "FuncDef");
        assert_eq!(arg["anonymous"], true);
        assert_eq!(arg["name"], "anonymous");
    }

    #[test]
    fn test_edge_arbitrary_expr_param_in_definition_rejected() {
        let err = parse_src("fn f(1 + 2) { }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("invalid argument"));
    }

    #[test]
    fn test_edge_arbitrary_expr_arg_in_call_allowed() {
        let program = json("f(1 + 2, g(3))");
        let args = &program["statements"][0]["args"]["args"];
        assert_eq!(args[0]["type"], "BinOp");
        assert_eq!(args[1]["type"], "Call");
    }

    #[test]
    fn test_edge_record_definition() {
        let program = json("struct Point { x = 0 y = 0 fn norm(self) { return self.x } }");
        let def = &program["statements"][0];
        assert_eq!(def["type"], "RecordDef");
        assert_eq!(def["name"], "Point");
        let members = def["members"].as_array().unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(members[0]["type"], "Assign");
        assert_eq!(members[2]["type"], "FuncDef");
    }

    #[test]
    fn test_edge_record_rejects_bare_expression() {
        let err = parse_src("struct P { 1 + 2 }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_edge_record_rejects_control_keyword() {
        let err = parse_src("struct P { while 1 { } }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unimplemented);
    }

    #[test]
    fn test_edge_if_elseif_else_chain() {
        let program = json("if a { 1 } elseif b { 2 } elseif c { 3 } else { 4 }");
        let node = &program["statements"][0];
        assert_eq!(node["type"], "If");
        assert_eq!(node["else_ifs"].as_array().unwrap().len(), 2);
        assert_eq!(node["else"]["type"], "Block");
    }

    #[test]
    fn test_edge_break_requires_semicolon() {
        assert!(parse_src("while 1 { break; }").is_ok());
        let err = parse_src("while 1 { break }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_edge_for_requires_from() {
        let err = parse_src("for i in 0..3 { }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert!(err.message.contains("from"));
    }

    #[test]
    fn test_edge_import_forms() {
        let all = json("import \"std:math\"");
        assert_eq!(all["statements"][0]["import_all"], true);
        assert_eq!(all["statements"][0]["path"], "std:math");

        let some = json("import [sq, pi] from \"math\"");
        let node = &some["statements"][0];
        assert_eq!(node["import_all"], false);
        assert_eq!(node["symbols"][0], "sq");
        assert_eq!(node["symbols"][1], "pi");
    }

    #[test]
    fn test_edge_import_missing_from_is_error() {
        let err = parse_src("import [a] \"m\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_edge_index_assign_with_expression_rhs() {
        let program = json("d[\"k\"] = 1 + 2");
        let node = &program["statements"][0];
        assert_eq!(node["type"], "IndexAssign");
        assert_eq!(node["args"][0]["value"], "k");
        assert_eq!(node["value"]["op"], "+");
    }

    #[test]
    fn test_edge_postfix_chain_mixes_forms() {
        let program = json("a.b(1)[2]");
        let node = &program["statements"][0];
        assert_eq!(node["type"], "Index");
        assert_eq!(node["object"]["type"], "MemberAccess");
        assert_eq!(node["object"]["member"]["type"], "Call");
    }

    #[test]
    fn test_edge_member_rhs_is_primary() {
        // `.` binds a primary on its right, so a call there stays part of
        // the member chain.
        let program = json("xs.push(4).size");
        let node = &program["statements"][0];
        assert_eq!(node["type"], "MemberAccess");
        assert_eq!(node["member"]["name"], "size");
    }

    #[test]
    fn test_edge_nested_not() {
        let program = json("not not x");
        let node = &program["statements"][0];
        assert_eq!(node["type"], "UnaryOp");
        assert_eq!(node["rhs"]["type"], "UnaryOp");
        assert_eq!(node["rhs"]["rhs"]["name"], "x");
    }

    #[test]
    fn test_edge_unary_sign_binds_whole_expression() {
        let program = json("-1 + 2");
        let node = &program["statements"][0];
        assert_eq!(node["type"], "UnaryOp");
        assert_eq!(node["op"], "-");
        assert_eq!(node["rhs"]["op"], "+");
    }

    #[test]
    fn test_edge_dict_trailing_comma_and_nesting() {
        let program = json("{\"a\": 1, \"b\": {\"c\": [1, 2]},}");
        let node = &program["statements"][0];
        assert_eq!(node["type"], "Dict");
        let items = node["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["value"]["type"], "Dict");
    }

    #[test]
    fn test_edge_empty_containers() {
        let program = json("[] {}");
        assert_eq!(program["statements"][0]["type"], "List");
        assert_eq!(program["statements"][1]["type"], "Dict");
    }

    #[test]
    fn test_edge_unterminated_block_is_error() {
        let err = parse_src("fn f() { 1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_edge_error_position_points_at_offender() {
        let err = parse_src("x = ;").unwrap_err();
        assert_eq!(err.pos.line, 0);
        assert_eq!(err.pos.row, 4);
    }
}
