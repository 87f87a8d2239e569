use lumen_core::programs::{ProgramId, ProgramTable};

#[test]
fn validate_all_programs() {
    let table = ProgramTable::load();
    let mut errors = Vec::new();

    for (id, source) in table.iter() {
        let module = match naga::front::wgsl::parse_str(source) {
            Ok(module) => module,
            Err(e) => {
                errors.push(format!("Failed to parse {:?}:\n{}", id, e.emit_to_string(source)));
                continue;
            }
        };

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );

        if let Err(e) = validator.validate(&module) {
            errors.push(format!("Failed to validate {:?}:\n{:?}", id, e));
        }
    }

    if !errors.is_empty() {
        panic!("Program validation failed:\n{}", errors.join("\n"));
    }
}

#[test]
fn compute_programs_expose_main() {
    let table = ProgramTable::load();
    for id in ProgramId::ALL {
        let Some(entry) = id.compute_entry() else {
            continue;
        };
        let module = naga::front::wgsl::parse_str(table.source(id)).unwrap();
        assert!(
            module
                .entry_points
                .iter()
                .any(|ep| ep.name == entry && ep.stage == naga::ShaderStage::Compute),
            "{id:?} has no compute entry point `{entry}`"
        );
    }
}
