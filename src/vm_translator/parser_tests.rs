// Parser classification tests

#[cfg(test)]
mod tests {
    use crate::vm_translator::command::{ArithmeticOp, Command, Segment};
    use crate::vm_translator::error::{SourcePosition, TranslatorError};
    use crate::vm_translator::parser::{normalize_line, parse_command, Parser};
    use test_log::test;

    fn pos() -> SourcePosition {
        SourcePosition::new("Test", 1)
    }

    fn parse(text: &str) -> Result<Command, TranslatorError> {
        parse_command(text, &pos())
    }

    #[test]
    fn test_normalize_strips_comments_and_blanks() {
        assert_eq!(normalize_line("   push constant 7   "), Some("push constant 7"));
        assert_eq!(normalize_line("add // sum the top two"), Some("add"));
        assert_eq!(normalize_line("// whole-line comment"), None);
        assert_eq!(normalize_line("   \t  "), None);
        assert_eq!(normalize_line(""), None);
    }

    #[test]
    fn test_all_arithmetic_keywords() {
        for op in ArithmeticOp::ALL {
            assert_eq!(parse(op.as_str()).unwrap(), Command::Arithmetic(op));
        }
    }

    #[test]
    fn test_stack_memory_forms() {
        assert_eq!(
            parse("push constant 7").unwrap(),
            Command::Push(Segment::Constant, 7)
        );
        assert_eq!(parse("pop local 2").unwrap(), Command::Pop(Segment::Local, 2));
        for segment in Segment::ALL {
            let text = format!("push {} 1", segment);
            assert_eq!(parse(&text).unwrap(), Command::Push(segment, 1));
        }
    }

    #[test]
    fn test_branch_and_function_forms() {
        assert_eq!(parse("label LOOP").unwrap(), Command::Label("LOOP".into()));
        assert_eq!(parse("goto LOOP").unwrap(), Command::Goto("LOOP".into()));
        assert_eq!(parse("if-goto END").unwrap(), Command::IfGoto("END".into()));
        assert_eq!(
            parse("function Main.fib 2").unwrap(),
            Command::Function {
                name: "Main.fib".into(),
                locals: 2
            }
        );
        assert_eq!(
            parse("call Main.fib 1").unwrap(),
            Command::Call {
                name: "Main.fib".into(),
                args: 1
            }
        );
        assert_eq!(parse("return").unwrap(), Command::Return);
    }

    #[test]
    fn test_wrong_operand_counts() {
        for (text, keyword, expected, found) in [
            ("add 1", "add", 0, 1),
            ("push local", "push", 2, 1),
            ("pop local 1 2", "pop", 2, 3),
            ("label", "label", 1, 0),
            ("goto A B", "goto", 1, 2),
            ("function Foo", "function", 2, 1),
            ("return 1", "return", 0, 1),
        ] {
            match parse(text) {
                Err(TranslatorError::WrongOperandCount(k, e, f, _)) => {
                    assert_eq!((k.as_str(), e, f), (keyword, expected, found), "{}", text);
                }
                other => panic!("'{}' should be a shape error, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_unknown_keyword_and_segment() {
        assert!(matches!(
            parse("mul"),
            Err(TranslatorError::UnknownCommand(ref k, _)) if k == "mul"
        ));
        assert!(matches!(
            parse("push heap 3"),
            Err(TranslatorError::UnknownSegment(ref s, _)) if s == "heap"
        ));
        assert!(matches!(
            parse("pop constant 3"),
            Err(TranslatorError::PopToConstant(_))
        ));
    }

    #[test]
    fn test_invalid_numbers() {
        for text in [
            "push constant -1",
            "push constant x",
            "push constant 32768",
            "call Foo two",
            "function Foo 1.5",
        ] {
            assert!(
                matches!(parse(text), Err(TranslatorError::InvalidNumber(..))),
                "'{}' should be rejected",
                text
            );
        }
        assert_eq!(
            parse("push constant 32767").unwrap(),
            Command::Push(Segment::Constant, 32767)
        );
    }

    #[test]
    fn test_label_names() {
        assert!(matches!(
            parse("label 9lives"),
            Err(TranslatorError::InvalidLabel(..))
        ));
        assert!(matches!(
            parse("goto bad-name"),
            Err(TranslatorError::InvalidLabel(..))
        ));
        for reserved in ["label IF.0", "label END_IF.4", "goto SP", "label aux1", "function Foo$ret 0"] {
            assert!(
                matches!(parse(reserved), Err(TranslatorError::ReservedLabel(..))),
                "'{}' should be reserved",
                reserved
            );
        }
    }

    #[test]
    fn test_parser_positions_count_raw_lines() {
        let source = "// header\n\npush constant 1\n   \npush constant 2 // two\nadd\n";
        let instructions = Parser::new("Prog", source).parse().unwrap();
        let lines: Vec<usize> = instructions.iter().map(|i| i.position.line).collect();
        assert_eq!(lines, vec![3, 5, 6]);
        assert_eq!(instructions[1].text, "push constant 2");
        assert_eq!(instructions[2].position, SourcePosition::new("Prog", 6));
    }

    #[test]
    fn test_parser_stops_at_first_error() {
        let source = "push constant 1\npush constant 2\nfrobnicate\npush heap 1\n";
        let err = Parser::new("Prog", source).parse().unwrap_err();
        assert_eq!(
            err,
            TranslatorError::UnknownCommand("frobnicate".into(), SourcePosition::new("Prog", 3))
        );
        assert_eq!(err.to_string(), "Prog:3: unknown command 'frobnicate'");
    }
}
