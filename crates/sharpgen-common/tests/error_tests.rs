use super::*;

#[test]
fn test_undefined_variables_message_lists_type_and_name() {
    let err = AnalysisError::UndefinedVariables {
        method: "GetValue".to_string(),
        variables: vec![
            UndefinedVariable::new("count", "int"),
            UndefinedVariable::new("names", "List<string>"),
        ],
    };

    assert_eq!(
        err.to_string(),
        "method 'GetValue' accesses undefined variable(s): int count, List<string> names"
    );
    assert_eq!(err.undefined_variable_names(), vec!["count", "names"]);
}

#[test]
fn test_invalid_structure_message() {
    let err = AnalysisError::invalid_structure("expected a lambda, found Binary");
    assert_eq!(
        err.to_string(),
        "invalid source code structure: expected a lambda, found Binary"
    );
    assert!(err.undefined_variable_names().is_empty());
}
