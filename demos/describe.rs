//! Describe SVG paths passed as arguments (or lines of stdin) as JSON objects
use serde_json::json;
use std::{
    collections::HashSet,
    env,
    io::{self, BufRead, Write},
};
use svgeom::*;
use tracing_subscriber::EnvFilter;

type Error = Box<dyn std::error::Error>;

#[derive(Debug)]
struct Args {
    paths: Vec<String>,
    params: Vec<Scalar>,
    tr: Transform,
    format: PathFormat,
}

impl Args {
    fn parse() -> Result<Args, Error> {
        let mut result = Args {
            paths: Vec::new(),
            params: vec![0.0, 0.25, 0.5, 0.75, 1.0],
            tr: Transform::identity(),
            format: PathFormat::default(),
        };
        let mut stdin = false;
        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "describe".to_string());
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-t" => {
                    let tr = args.next().ok_or("-t requires argument")?;
                    result.tr = tr.parse()?;
                }
                "-p" => {
                    let params = args.next().ok_or("-p requires argument")?;
                    result.params = params
                        .split(',')
                        .map(|param| param.trim().parse::<Scalar>())
                        .collect::<Result<Vec<_>, _>>()?;
                }
                "-r" => result.format.relative = true,
                "-s" => result.format.shorthand = true,
                "-" => stdin = true,
                "-h" => {
                    eprintln!(
                        "Usage: {} [-t <transform>] [-p <t,..>] [-r] [-s] (<path> | -)..",
                        cmd
                    );
                    std::process::exit(0);
                }
                _ => result.paths.push(arg),
            }
        }
        if stdin {
            for line in io::stdin().lock().lines() {
                let line = line?;
                if !line.trim().is_empty() {
                    result.paths.push(line);
                }
            }
        }
        Ok(result)
    }
}

fn describe(path: &Path, args: &Args) -> Result<serde_json::Value, Error> {
    let mut samples = Vec::with_capacity(args.params.len());
    for t in args.params.iter().copied() {
        let sample = match path.point_at(t) {
            Err(svgeom::Error::EmptyPath) => json!({ "t": t, "point": null }),
            Err(error) => return Err(error.into()),
            Ok(point) => {
                let deriv = path.derivative_at(t)?;
                let (head, tail) = path.crop(t)?.into_pair();
                json!({
                    "t": t,
                    "point": point,
                    "derivative": deriv.vector,
                    "degenerate": deriv.note,
                    "crop": [
                        head.to_svg_path(args.format),
                        tail.to_svg_path(args.format),
                    ],
                })
            }
        };
        samples.push(sample);
    }
    Ok(json!({
        "d": path.to_svg_path(args.format),
        "length": path.length(),
        "bbox": path.bbox(),
        "samples": samples,
    }))
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut seen = HashSet::new();
    for text in args.paths.iter() {
        if !seen.insert(text.as_str()) {
            tracing::debug!(path = %text, "skipping duplicate path");
            continue;
        }
        let (path, notes) = match parse_path_with_notes(text) {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(%error, path = %text, "failed to parse path");
                writeln!(out, "{}", json!({ "d": text, "error": error.to_string() }))?;
                continue;
            }
        };
        let (path, transform_notes) = path.transform_with_notes(args.tr);
        let mut value = describe(&path, &args)?;
        value["notes"] = json!(notes.into_iter().chain(transform_notes).collect::<Vec<_>>());
        writeln!(out, "{}", value)?;
    }
    Ok(())
}
