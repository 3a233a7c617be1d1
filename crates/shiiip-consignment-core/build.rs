/// Builds the gRPC client and server code for the consignment and vessel
/// protocols using `tonic-prost-build`.
///
/// Both `.proto` files are compiled in a single pass so that one file
/// descriptor set covers every service. The server registers that set with
/// `tonic-reflection`.
///
/// # Files and Paths
///
/// - Proto files: `proto/consignment.proto`, `proto/vessel.proto`
/// - Includes: `proto/`
/// - Descriptor set: `$OUT_DIR/shiiip_descriptor.bin`
///
/// # Panics
///
/// Panics if code generation fails.
use std::env;
use std::path::PathBuf;

const PROTOS: &[&str] = &["proto/consignment.proto", "proto/vessel.proto"];

fn main() {
    for proto in PROTOS {
        println!("cargo:rerun-if-changed={proto}");
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let descriptor_path = out_dir.join("shiiip_descriptor.bin");

    let mut config = tonic_prost_build::Config::new();
    config.file_descriptor_set_path(&descriptor_path);

    tonic_prost_build::configure()
        .compile_with_config(config, PROTOS, &["proto"])
        .unwrap();
}
