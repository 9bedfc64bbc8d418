use super::{json_pretty, EXIT_SUCCESS};
use datcat_core::sort_by_collation;
use datcat_schema::Collation;

pub fn run(mut names: Vec<String>, reverse: bool, json: bool) -> Result<u8, String> {
    let collation = if reverse {
        Collation::NaturalReverse
    } else {
        Collation::Natural
    };
    sort_by_collation(&mut names, collation);

    if json {
        println!("{}", json_pretty(&names)?);
    } else {
        for name in &names {
            println!("{name}");
        }
    }
    Ok(EXIT_SUCCESS)
}
