fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_prost_build::compile_protos("proto/urlshortener/v1/urlshortener.proto")?;
    Ok(())
}
