#![no_main]

use libfuzzer_sys::fuzz_target;
use perfiz_types::PerfizConfig;

fuzz_target!(|config: PerfizConfig| {
    let Ok(yaml) = serde_yaml::to_string(&config) else {
        return;
    };
    let parsed: PerfizConfig = serde_yaml::from_str(&yaml).expect("serialized config must parse");
    assert_eq!(parsed.karate_features_dir, config.karate_features_dir);
    assert_eq!(parsed.gatling_simulation_class(), config.gatling_simulation_class());
});
