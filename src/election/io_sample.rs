// Built-in ballots used when no input file is given.

use crate::election::fields::BallotRecord;

pub fn sample_ballots() -> Vec<BallotRecord> {
    let region = "Áncash";
    let province = "Asunción";
    let district = "Acochaca";
    vec![
        BallotRecord::new(region, province, district, 40810062, "Eddie Hinesley", false),
        BallotRecord::new(region, province, district, 57533597, "Eddie Hinesley", true),
        BallotRecord::new(region, province, district, 86777322, "Aundrea Grace", true),
        BallotRecord::new(region, province, district, 23017965, "Aundrea Grace", true),
    ]
}
