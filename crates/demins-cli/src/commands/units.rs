use crate::error::Result;
use demins::core::models::species::ConcentrationUnit;
use demins::core::units::UnitSystem;

pub fn run() -> Result<()> {
    print!("{}", render(&UnitSystem::new())?);
    Ok(())
}

fn render(units: &UnitSystem) -> Result<String> {
    let mut out = String::from("Species concentration units (case-insensitive):\n");
    for tag in ConcentrationUnit::ALL {
        let kind = if tag.is_radionuclide() {
            "activity"
        } else {
            "mass ratio"
        };
        let factor = units.unit(tag.tag())?.factor();
        out.push_str(&format!(
            "  {:<6} {:<10}  1 {} = {:e} mass fraction\n",
            tag.tag(),
            kind,
            tag.tag(),
            factor
        ));
    }
    Ok(out)
}
