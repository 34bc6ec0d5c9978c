use std::fs;
use std::path::Path;

use anyhow::Context;

/// Placeholder tokens recognized in descriptor templates. Tokens are
/// disjoint literal strings, so substitution order never matters.
pub mod tokens {
    pub const ID: &str = "$ID";
    pub const MODEL_SHORT: &str = "$MODEL_SHORT";
    pub const MODEL_LONG: &str = "$MODEL_LONG";
    pub const YCB_FOLDER: &str = "$YCB_FOLDER";
    pub const MESH_TYPE: &str = "$MESH_TYPE";
    pub const MASS: &str = "$MASS";
    pub const BOTTOM: &str = "$BOTTOM";
    pub const UPPER: &str = "$UPPER";
    pub const RADIUS: &str = "$RADIUS";
    pub const VERTICAL_RADIUS: &str = "$VERTICAL_RADIUS";
    pub const RATIO: &str = "$RATIO";
    pub const COM: &str = "$COM";
    pub const IXX: &str = "$IXX";
    pub const IYY: &str = "$IYY";
    pub const IZZ: &str = "$IZZ";
    pub const IXY: &str = "$IXY";
    pub const IXZ: &str = "$IXZ";
    pub const IYZ: &str = "$IYZ";
    pub const MESH_MODEL_SHORT_FILE: &str = "$MESH_MODEL_SHORT_FILE";
    pub const TEXTURE_MODEL_SHORT_FILE: &str = "$TEXTURE_MODEL_SHORT_FILE";
    pub const UNTEX_MESH_MODEL_SHORT_FILE: &str = "$UNTEX_MESH_MODEL_SHORT_FILE";
    pub const ADDRESS: &str = "$ADDRESS";

    pub const ALL: &[&str] = &[
        ID,
        MODEL_SHORT,
        MODEL_LONG,
        YCB_FOLDER,
        MESH_TYPE,
        MASS,
        BOTTOM,
        UPPER,
        RADIUS,
        VERTICAL_RADIUS,
        RATIO,
        COM,
        IXX,
        IYY,
        IZZ,
        IXY,
        IXZ,
        IYZ,
        MESH_MODEL_SHORT_FILE,
        TEXTURE_MODEL_SHORT_FILE,
        UNTEX_MESH_MODEL_SHORT_FILE,
        ADDRESS,
    ];
}

/// A descriptor template: raw text with `$TOKEN` placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    text: String,
}

impl Template {
    /// A missing template file is fatal to the whole run, there is no
    /// per-asset recovery from it.
    pub fn load(path: &Path) -> anyhow::Result<Template> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        Ok(Template { text })
    }

    pub fn from_text(text: impl Into<String>) -> Template {
        Template { text: text.into() }
    }

    /// Literal single-pass substitution: every occurrence of every token is
    /// replaced by its value. Tokens absent from the template are no-ops,
    /// there is no escaping and no recursive expansion.
    pub fn render(&self, substitutions: &[(&str, String)]) -> String {
        let mut text = self.text.clone();
        for (token, value) in substitutions {
            text = text.replace(token, value);
        }
        text
    }
}

/// Which of the known tokens still occur literally in the given text.
/// Rendered descriptors must not contain any.
pub fn leftover_tokens(text: &str) -> Vec<&'static str> {
    tokens::ALL
        .iter()
        .copied()
        .filter(|token| text.contains(token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_tokens_literally() {
        let template = Template::from_text("<mesh id=$ID mass=$MASS/>");
        let output = template.render(&[
            (tokens::ID, "7".to_owned()),
            (tokens::MASS, "0.5".to_owned()),
        ]);
        assert_eq!(output, "<mesh id=7 mass=0.5/>");
    }

    #[test]
    fn substitutes_every_occurrence() {
        let template = Template::from_text("o$ID references mesh o$ID");
        let output = template.render(&[(tokens::ID, "0191".to_owned())]);
        assert_eq!(output, "o0191 references mesh o0191");
    }

    #[test]
    fn absent_tokens_are_a_noop() {
        let template = Template::from_text("<geom size=$RADIUS/>");
        let output = template.render(&[
            (tokens::RADIUS, "0.03".to_owned()),
            (tokens::MASS, "0.5".to_owned()),
        ]);
        assert_eq!(output, "<geom size=0.03/>");
    }

    #[test]
    fn substitution_order_does_not_matter() {
        let template = Template::from_text("$RADIUS $VERTICAL_RADIUS $ID $IXX $IXY");
        let forward = [
            (tokens::RADIUS, "r".to_owned()),
            (tokens::VERTICAL_RADIUS, "vr".to_owned()),
            (tokens::ID, "7".to_owned()),
            (tokens::IXX, "a".to_owned()),
            (tokens::IXY, "b".to_owned()),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(template.render(&forward), template.render(&reversed));
        assert_eq!(template.render(&forward), "r vr 7 a b");
    }

    #[test]
    fn leftover_tokens_are_reported() {
        let rendered = "<mesh file=model.msh scale=$RATIO $RATIO $RATIO/>";
        assert_eq!(leftover_tokens(rendered), vec![tokens::RATIO]);
        assert!(leftover_tokens("<mesh file=model.msh/>").is_empty());
    }

    #[test]
    fn missing_template_file_is_fatal() {
        let result = Template::load(Path::new("does/not/exist.xml"));
        assert!(result.is_err());
    }
}
