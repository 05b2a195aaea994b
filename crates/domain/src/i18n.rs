//! Label resolution seam.
//!
//! Every label-producing call takes a `&dyn Translator`. The domain never
//! reaches for a global locale; callers without a localization subsystem
//! pass [`FallbackTranslator`], which yields the default-locale strings
//! compiled into the tables.

/// Resolves a translation key, returning `fallback` when the key is unknown.
#[cfg_attr(test, mockall::automock)]
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, fallback: &str) -> String;
}

/// Returns the compiled-in default-locale string for every key.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackTranslator;

impl Translator for FallbackTranslator {
    fn translate(&self, _key: &str, fallback: &str) -> String {
        fallback.to_string()
    }
}

impl<F> Translator for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn translate(&self, key: &str, fallback: &str) -> String {
        self(key, fallback)
    }
}

/// Shared instance for contexts that need a `'static` translator reference.
pub static FALLBACK: FallbackTranslator = FallbackTranslator;

/// Translates `key` and substitutes `{name}` placeholders in the result.
pub fn translate_with(
    t: &dyn Translator,
    key: &str,
    fallback: &str,
    args: &[(&str, String)],
) -> String {
    let mut text = t.translate(key, fallback);
    for (name, value) in args {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}
