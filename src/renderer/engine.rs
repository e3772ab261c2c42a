use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;
use minijinja::value::{Value, ValueKind};
use minijinja::{AutoEscape, Environment, Error, ErrorKind, State, UndefinedBehavior};

use super::encoding::Encoding;
use super::interface::TemplateRenderer;
use super::namespace::Namespace;
use super::scanner::{quote_bare_keys, scan, Segment};
use crate::constants::{INCLUDE_FN, INCLUDE_TEMPLATE_FN, MAX_INCLUDE_DEPTH};
use crate::error::IncludeError;

/// Context key carrying the `includeTemplate` nesting depth.
///
/// Not a valid identifier, so expressions cannot see or shadow it.
const DEPTH_KEY: &str = "kiln:include-depth";

/// MiniJinja-backed evaluator of `${ ... }` spans.
///
/// Expressions use the MiniJinja expression grammar. `include` and
/// `includeTemplate` are registered as functions, so they are visible to every
/// evaluation, nested ones included.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
    /// Encoding of templated source files
    encoding: Encoding,
}

impl MiniJinjaRenderer {
    /// Creates a renderer resolving relative include paths against `base_dir`.
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self::with_options(base_dir, Encoding::default(), &IndexMap::new())
    }

    /// Creates a renderer with a default include encoding and extra global bindings.
    ///
    /// # Arguments
    /// * `base_dir` - Directory relative include paths are resolved against
    /// * `encoding` - Encoding used when a helper call does not name one
    /// * `globals` - Values visible to every evaluation
    pub fn with_options<P: Into<PathBuf>>(
        base_dir: P,
        encoding: Encoding,
        globals: &IndexMap<String, serde_json::Value>,
    ) -> Self {
        let base_dir = Arc::new(base_dir.into());
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        for (name, value) in globals {
            env.add_global(name.clone(), Value::from_serialize(value));
        }

        let root = Arc::clone(&base_dir);
        env.add_function(
            INCLUDE_FN,
            move |path: &str, options: Option<Value>| -> Result<String, Error> {
                let encoding = encoding_option(options.as_ref(), encoding)?;
                read_included(&root, path, encoding)
            },
        );

        let root = Arc::clone(&base_dir);
        env.add_function(
            INCLUDE_TEMPLATE_FN,
            move |state: &State,
                  path: &str,
                  params: Option<Value>,
                  options: Option<Value>|
                  -> Result<String, Error> {
                let depth = state.lookup(DEPTH_KEY).and_then(|v| v.as_usize()).unwrap_or(0);
                if depth >= MAX_INCLUDE_DEPTH {
                    return Err(Error::new(
                        ErrorKind::InvalidOperation,
                        format!(
                            "include depth of {MAX_INCLUDE_DEPTH} exceeded while including '{path}'"
                        ),
                    ));
                }

                let encoding = encoding_option(options.as_ref(), encoding)?;
                let raw = read_included(&root, path, encoding)?;

                let mut namespace = Namespace::new();
                if let Some(params) = &params {
                    namespace.extend_from_value(params)?;
                }
                namespace.insert_metadata(path);
                debug!("Including template '{}' with {} bindings", path, namespace.len());

                evaluate(state.env(), &raw, &namespace, depth + 1)
            },
        );

        Self { env, encoding }
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, namespace: &Namespace) -> Result<String, Error> {
        evaluate(&self.env, template, namespace, 0)
    }

    fn read(&self, path: &Path) -> std::io::Result<String> {
        self.encoding.read_to_string(path)
    }
}

/// Evaluates every span of `text` against `namespace` and splices the results in.
fn evaluate(
    env: &Environment<'_>,
    text: &str,
    namespace: &Namespace,
    depth: usize,
) -> Result<String, Error> {
    let segments = scan(text)?;
    let mut context: Option<Value> = None;

    let mut output = String::with_capacity(text.len());
    for segment in segments {
        match segment {
            Segment::Literal(literal) => output.push_str(literal),
            Segment::Expression { source, line } => {
                let context = context.get_or_insert_with(|| {
                    let mut bindings = namespace.clone();
                    bindings.insert(DEPTH_KEY, depth);
                    bindings.to_context()
                });
                let value = eval_expression(env, source, context)
                    .map_err(|e| annotate(e, source, line))?;
                output.push_str(&value.to_string());
            }
        }
    }
    Ok(output)
}

fn eval_expression(env: &Environment<'_>, source: &str, context: &Value) -> Result<Value, Error> {
    let source = quote_bare_keys(source);
    let expr = env.compile_expression(&source)?;
    let value = expr.eval(context)?;
    if value.is_undefined() {
        return Err(Error::new(
            ErrorKind::UndefinedError,
            "expression evaluated to an undefined value",
        ));
    }
    Ok(value)
}

/// Prefixes the failing span to an error while keeping its source chain intact.
fn annotate(err: Error, source: &str, line: usize) -> Error {
    let detail = match err.detail() {
        Some(detail) => format!("{detail} (in `${{{}}}` at line {line})", source.trim()),
        None => format!("{} (in `${{{}}}` at line {line})", err.kind(), source.trim()),
    };
    Error::new(err.kind(), detail).with_source(err)
}

fn encoding_option(options: Option<&Value>, fallback: Encoding) -> Result<Encoding, Error> {
    let Some(options) = options.filter(|o| !o.is_none() && !o.is_undefined()) else {
        return Ok(fallback);
    };
    if options.kind() != ValueKind::Map {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("include options must be a map, got {}", options.kind()),
        ));
    }

    let encoding = options.get_attr("encoding")?;
    if encoding.is_undefined() || encoding.is_none() {
        return Ok(fallback);
    }
    let name = encoding.as_str().ok_or_else(|| {
        Error::new(ErrorKind::InvalidOperation, "include encoding must be a string")
    })?;
    name.parse().map_err(|e: String| Error::new(ErrorKind::InvalidOperation, e))
}

fn read_included(base_dir: &Path, path: &str, encoding: Encoding) -> Result<String, Error> {
    let resolved = base_dir.join(path);
    debug!("Reading '{}' as {:?}", resolved.display(), encoding);
    encoding.read_to_string(&resolved).map_err(|source| {
        let include = IncludeError { path: PathBuf::from(path), source };
        Error::new(ErrorKind::InvalidOperation, include.to_string()).with_source(include)
    })
}
