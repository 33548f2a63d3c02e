use schemars::schema_for;
use survival_energy::input::Input;

fn main() -> anyhow::Result<()> {
    let schema = schema_for!(Input);
    println!("{}", serde_json::to_string_pretty(&schema)?);

    Ok(())
}
