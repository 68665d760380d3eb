use assert_cmd::Command;
use assert_fs::NamedTempFile;
use assert_fs::prelude::*;
use predicates::prelude::*;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn cli_command() -> Result<Command> {
    Ok(Command::cargo_bin("turtlefold")?)
}

#[test]
fn cli_help() -> Result<()> {
    cli_command()?
        .arg("--help")
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stdout(predicate::str::contains("pretty Turtle"));
    Ok(())
}

#[test]
fn cli_stdin_to_stdout() -> Result<()> {
    cli_command()?
        .arg("--format")
        .arg("turtle")
        .write_stdin("@prefix schema: <http://schema.org/> .\n@prefix unused: <http://example.com/unused#> .\n<http://example.com#me> schema:address [ schema:addressCountry \"FR\" ] .\n")
        .assert()
        .success()
        .stdout("@prefix schema: <http://schema.org/> .\n<http://example.com#me> schema:address [ schema:addressCountry \"FR\" ] .\n");
    Ok(())
}

#[test]
fn cli_file_to_file() -> Result<()> {
    let input_file = NamedTempFile::new("input.nt")?;
    input_file.write_str("<http://example.com/s> <http://example.com/p> _:a .\n_:a <http://example.com/q> \"v\"@en .\n<http://example.com/s> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.com/C> .\n")?;
    let output_file = NamedTempFile::new("output.ttl")?;
    cli_command()?
        .arg("--file")
        .arg(input_file.path())
        .arg("--output")
        .arg(output_file.path())
        .arg("--prefix")
        .arg("ex=http://example.com/")
        .arg("--base")
        .arg("http://example.com/")
        .assert()
        .success();
    output_file.assert("@base <http://example.com/> .\n@prefix ex: <http://example.com/> .\nex:s ex:p [ ex:q \"v\"@en ] ;\n\ta ex:C .\n");
    Ok(())
}

#[test]
fn cli_prefix_overrides_input_declaration() -> Result<()> {
    cli_command()?
        .arg("--format")
        .arg("turtle")
        .arg("--prefix")
        .arg("new=http://example.com/")
        .write_stdin("@prefix old: <http://example.com/> .\nold:s old:p old:o .\n")
        .assert()
        .success()
        .stdout("@prefix new: <http://example.com/> .\nnew:s new:p new:o .\n");
    Ok(())
}

#[test]
fn cli_no_folding() -> Result<()> {
    cli_command()?
        .arg("--format")
        .arg("ntriples")
        .arg("--no-folding")
        .write_stdin("<http://example.com/s> <http://example.com/p> _:x .\n_:x <http://example.com/q> <http://example.com/o> .\n")
        .assert()
        .success()
        .stdout("<http://example.com/s> <http://example.com/p> _:b0 .\n_:b0 <http://example.com/q> <http://example.com/o> .\n");
    Ok(())
}

#[test]
fn cli_logs_to_stderr() -> Result<()> {
    cli_command()?
        .arg("--format")
        .arg("ntriples")
        .arg("--log-format")
        .arg("json")
        .env("RUST_LOG", "info")
        .write_stdin("<http://example.com/s> <http://example.com/p> <http://example.com/o> .\n")
        .assert()
        .success()
        .stdout("<http://example.com/s> <http://example.com/p> <http://example.com/o> .\n")
        .stderr(predicate::str::contains("Turtle document written"));
    Ok(())
}

#[test]
fn cli_requires_format_for_stdin() -> Result<()> {
    cli_command()?
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--format"));
    Ok(())
}

#[test]
fn cli_unknown_extension() -> Result<()> {
    let input_file = NamedTempFile::new("input.rdf")?;
    input_file.write_str("")?;
    cli_command()?
        .arg("--file")
        .arg(input_file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("'rdf'"));
    Ok(())
}

#[test]
fn cli_invalid_prefix() -> Result<()> {
    cli_command()?
        .arg("--format")
        .arg("ntriples")
        .arg("--prefix")
        .arg("ex")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=IRI"));
    cli_command()?
        .arg("--format")
        .arg("ntriples")
        .arg("--prefix")
        .arg("1ex=http://example.com/")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid prefix declaration"));
    Ok(())
}

#[test]
fn cli_invalid_input() -> Result<()> {
    cli_command()?
        .arg("--format")
        .arg("turtle")
        .write_stdin("<http://example.com/s> <http://example.com/p> .")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn cli_invalid_input_does_not_create_output() -> Result<()> {
    let output_file = NamedTempFile::new("output.ttl")?;
    cli_command()?
        .arg("--format")
        .arg("ntriples")
        .arg("--output")
        .arg(output_file.path())
        .write_stdin("<http://example.com/s> <http://example.com/p> .\n")
        .assert()
        .failure();
    output_file.assert(predicate::path::missing());
    Ok(())
}

#[test]
fn cli_max_folding_depth() -> Result<()> {
    let input = "<http://example.com/s> <http://example.com/p> _:a .\n_:a <http://example.com/p> _:b .\n_:b <http://example.com/p> <http://example.com/o> .\n";
    cli_command()?
        .arg("--format")
        .arg("ntriples")
        .write_stdin(input)
        .assert()
        .success()
        .stdout("<http://example.com/s> <http://example.com/p> [ <http://example.com/p> [ <http://example.com/p> <http://example.com/o> ] ] .\n");
    cli_command()?
        .arg("--format")
        .arg("ntriples")
        .arg("--max-folding-depth")
        .arg("1")
        .write_stdin(input)
        .assert()
        .success()
        .stdout("<http://example.com/s> <http://example.com/p> [ <http://example.com/p> _:b0 ] .\n_:b0 <http://example.com/p> <http://example.com/o> .\n");
    Ok(())
}

#[test]
fn cli_invalid_base() -> Result<()> {
    cli_command()?
        .arg("--format")
        .arg("ntriples")
        .arg("--base")
        .arg("not an iri")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid base IRI"));
    Ok(())
}
