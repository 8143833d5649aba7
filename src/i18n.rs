/// Translates user-facing templates before placeholders are filled in.
pub trait Localizer: Send + Sync {
    fn localize(&self, template: &str) -> String;
}

/// Returns every template as written.
#[derive(Clone, Copy, Debug, Default)]
pub struct Untranslated;

impl Localizer for Untranslated {
    fn localize(&self, template: &str) -> String {
        template.to_string()
    }
}

/// Replaces each `{name}` in `template` with its value.
pub fn interpolate(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
}
