fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/user.proto"], &["proto/"])?;

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/auth.proto"], &["proto/"])?;

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/payment.proto"], &["proto/"])?;

    Ok(())
}
