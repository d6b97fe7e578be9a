//! Exporting values as LaTeX macro definitions (`\def`, `\newcommand`,
//! `\renewcommand`), so computed results can be referenced from a document
//! by name.

use crate::error::EvalError;
use crate::expression::Expression;
use crate::variable::Variable;

/// The LaTeX command used for a macro definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MacroCommand {
    #[default]
    Def,
    NewCommand,
    RenewCommand,
}

/// Which rendering of a value becomes the macro body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroBody {
    /// The bare numeric value.
    Value,
    /// The formatted result (possibly scientific).
    Result,
    /// The formatted result with its unit.
    ResultWithUnit,
    /// The symbolic rendering.
    Symbolic,
    /// The substituted rendering.
    Substituted,
    /// The full `Display` line.
    Full,
}

/// Builds a LaTeX macro definition with the given body.
pub fn latex_macro(name: &str, body: &str, command: MacroCommand) -> String {
    match command {
        MacroCommand::Def => format!(r"\def\{name}{{{body}}}"),
        MacroCommand::NewCommand => format!(r"\newcommand{{\{name}}}{{{body}}}"),
        MacroCommand::RenewCommand => format!(r"\renewcommand{{\{name}}}{{{body}}}"),
    }
}

impl Variable {
    /// Exports the receiver as a LaTeX macro definition.
    ///
    /// `MacroBody::Value` requires a value and reports
    /// [`EvalError::Symbolic`] for symbolic variables; every other body kind
    /// renders the same string the corresponding `latex_*` method returns.
    pub fn latex_macro(
        &self,
        name: &str,
        body: MacroBody,
        command: MacroCommand,
    ) -> Result<String, EvalError> {
        let body = match body {
            MacroBody::Value => self.eval()?.to_string(),
            MacroBody::Result => self.latex_result(),
            MacroBody::ResultWithUnit => self.latex_result_with_unit(),
            MacroBody::Symbolic => self.latex_symbolic(),
            MacroBody::Substituted => self.latex_substituted(),
            MacroBody::Full => self.to_string(),
        };
        Ok(latex_macro(name, &body, command))
    }
}

impl Expression {
    /// Exports the receiver as a LaTeX macro definition.
    pub fn latex_macro(
        &self,
        name: &str,
        body: MacroBody,
        command: MacroCommand,
    ) -> Result<String, EvalError> {
        let body = match body {
            MacroBody::Value => self.eval()?.to_string(),
            MacroBody::Result => self.latex_result(),
            MacroBody::ResultWithUnit => self.latex_result_with_unit(),
            MacroBody::Symbolic => self.operation.latex_symbolic(),
            MacroBody::Substituted => self.operation.latex_substituted(),
            MacroBody::Full => self.to_string(),
        };
        Ok(latex_macro(name, &body, command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_forms() {
        assert_eq!(
            latex_macro("varName", "some content", MacroCommand::Def),
            r"\def\varName{some content}"
        );
        assert_eq!(
            latex_macro("varName", "some content", MacroCommand::NewCommand),
            r"\newcommand{\varName}{some content}"
        );
        assert_eq!(
            latex_macro("varName", "some content", MacroCommand::RenewCommand),
            r"\renewcommand{\varName}{some content}"
        );
    }

    #[test]
    fn variable_bodies() {
        let v = Variable::new("a_{22}", 3.45).with_unit("mm");
        assert_eq!(
            v.latex_macro("AA", MacroBody::Value, MacroCommand::Def),
            Ok(r"\def\AA{3.45}".to_string())
        );
        assert_eq!(
            v.latex_macro("AA", MacroBody::ResultWithUnit, MacroCommand::NewCommand),
            Ok(r"\newcommand{\AA}{3.45 \ \mathrm{mm}}".to_string())
        );
        assert_eq!(
            v.latex_macro("AA", MacroBody::Full, MacroCommand::Def),
            Ok(r"\def\AA{a_{22} = 3.45 \ \mathrm{mm}}".to_string())
        );
        assert_eq!(
            Variable::symbolic("x").latex_macro("X", MacroBody::Value, MacroCommand::Def),
            Err(EvalError::Symbolic("x".to_string()))
        );
    }

    #[test]
    fn expression_bodies() {
        let v = Variable::new("v", 2.0);
        let e = Expression::new("E", &v + &v);
        assert_eq!(
            e.latex_macro("EE", MacroBody::Symbolic, MacroCommand::Def),
            Ok(r"\def\EE{{v} + {v}}".to_string())
        );
        assert_eq!(
            e.latex_macro("EE", MacroBody::Result, MacroCommand::Def),
            Ok(r"\def\EE{4}".to_string())
        );
    }
}
