mod config;

use std::{error::Error, fs, path::Path};

use config::{DiffConfig, OutputFormat};
use differ::Differ;
use shape::{Shape, ShapeDocument, Value};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "shapediff=info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = DiffConfig::parse();
    let shape = match &config.shape {
        Some(path) => ShapeDocument::from_slice(&fs::read(path)?)?.build()?,
        None => Shape::json(),
    };
    let from = read_value(&config.from)?;
    let to = read_value(&config.to)?;

    println!("{}", render(&shape, &from, &to, config.output, config.reverse)?);
    Ok(())
}

fn read_value(path: &Path) -> Result<Value, Box<dyn Error>> {
    let value: serde_json::Value = serde_json::from_slice(&fs::read(path)?)?;
    Ok(value.into())
}

fn render(
    shape: &Shape,
    from: &Value,
    to: &Value,
    output: OutputFormat,
    reverse: bool,
) -> Result<String, Box<dyn Error>> {
    let mut patch = Differ::compile(shape).diff(from, to);
    if reverse {
        patch = patch.reverse();
    }
    tracing::info!(identical = patch.is_identical(), "compared");

    Ok(match output {
        OutputFormat::Patch => serde_json::to_string_pretty(&patch.to_json_patch()?)?,
        OutputFormat::Ops => serde_json::to_string_pretty(patch.op())?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn render_json(output: OutputFormat, reverse: bool) -> serde_json::Value {
        let from = Value::from(json!({"name": "a", "tags": ["x"]}));
        let to = Value::from(json!({"name": "b", "tags": ["x", "y"]}));
        let rendered = render(&Shape::json(), &from, &to, output, reverse).unwrap();
        serde_json::from_str(&rendered).unwrap()
    }

    #[test]
    fn patch_output() {
        assert_eq!(
            render_json(OutputFormat::Patch, false),
            json!([
                {"op": "replace", "path": "/name", "value": "b"},
                {"op": "add", "path": "/tags/1", "value": "y"},
            ])
        );
        assert_eq!(
            render_json(OutputFormat::Patch, true),
            json!([
                {"op": "replace", "path": "/name", "value": "a"},
                {"op": "remove", "path": "/tags/1"},
            ])
        );
    }

    #[test]
    fn ops_output() {
        assert_eq!(
            render_json(OutputFormat::Ops, false),
            json!({
                "op": "objectOps",
                "entries": [
                    ["name", {"op": "replace", "from": "a", "to": "b"}],
                    ["tags", {"op": "arrayOps", "entries": [[1, {"op": "add", "value": "y"}]]}],
                ]
            })
        );
    }

    #[test]
    fn documents_select_the_shape() {
        let shape = ShapeDocument::from_slice(
            br#"{"root": {"type": "struct", "fields": [{"name": "id", "shape": {"type": "number"}}]}}"#,
        )
        .unwrap()
        .build()
        .unwrap();
        let rendered = render(
            &shape,
            &json!({"id": 1, "note": "a"}).into(),
            &json!({"id": 1, "note": "b"}).into(),
            OutputFormat::Patch,
            false,
        )
        .unwrap();
        assert_eq!(rendered, "[]");
    }
}
