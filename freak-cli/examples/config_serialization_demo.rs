use freak_core::DescriptorExtractor;
use freak_descriptor::{ExtractorBuilder, ExtractorConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔧 FREAK Configuration Serialization Demo");
    println!("=========================================\n");

    // Demo 1: Presets
    println!("📋 Demo 1: Presets");
    let presets = [
        ExtractorConfig::standard_preset(),
        ExtractorConfig::upright_preset(),
        ExtractorConfig::fixed_scale_preset(),
        ExtractorConfig::calibration_preset(),
    ];
    for preset in &presets {
        println!("   • {}", preset.summary());
    }

    // Demo 2: JSON and TOML
    println!("\n📄 Demo 2: JSON and TOML");
    let dir = std::env::temp_dir();
    let json_path = dir.join("freak_upright.json");
    let toml_path = dir.join("freak_calibration.toml");

    presets[1].save_json(&json_path)?;
    presets[3].save_toml(&toml_path)?;
    println!("   {}", presets[1].to_json()?);
    println!("   ✅ Saved {} and {}", json_path.display(), toml_path.display());

    let upright = ExtractorConfig::load_json(&json_path)?;
    let calibration = ExtractorConfig::load_toml(&toml_path)?;
    println!("   • From JSON: {}", upright.summary());
    println!("   • From TOML: {}", calibration.summary());

    // Demo 3: Builder round trip
    println!("\n🏗️  Demo 3: Builder");
    let builder = upright.to_builder().pattern_scale(18.0).octaves(3);
    println!("   {}", builder.summary());
    let extractor = builder.build()?;
    println!(
        "   ✅ Extractor ready: {} bytes per descriptor, {:?}",
        extractor.descriptor_size(),
        extractor.descriptor_type()
    );

    let extended = ExtractorBuilder::new().preset_calibration().build()?;
    println!(
        "   ✅ Calibration extractor: {} bytes per descriptor",
        extended.descriptor_size()
    );

    std::fs::remove_file(json_path)?;
    std::fs::remove_file(toml_path)?;
    Ok(())
}
