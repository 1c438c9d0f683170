// Defaults and the template written by `--init`

use super::types::Config;
use std::collections::BTreeMap;

impl Default for Config {
    fn default() -> Self {
        Config {
            nhs_environment: None,
            mhs_inbound_url: None,
            mhs_outbound_url: None,
            fixtures: BTreeMap::new(),
        }
    }
}

pub const CONFIG_TEMPLATE: &str = r#"# mhs-probe configuration
#
# NHS_ENVIRONMENT, MHS_INBOUND_URL and MHS_OUTBOUND_URL override the values
# below; --env overrides everything.

nhs_environment = "dev"

# Defaults to https://inbound.mhs.<env>.non-prod.patient-deductions.nhs.uk
# mhs_inbound_url = "https://inbound.mhs.dev.non-prod.patient-deductions.nhs.uk"

# Defaults to https://outbound.mhs.<env>.non-prod.patient-deductions.nhs.uk
# mhs_outbound_url = "https://outbound.mhs.dev.non-prod.patient-deductions.nhs.uk"

[fixtures.dev]
repo_asid = "<repo asid>"
nhs_number = "<synthetic patient nhs number>"
gp_ods_code = "<gp ods code>"
"#;
