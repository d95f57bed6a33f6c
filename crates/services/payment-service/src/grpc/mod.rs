//! gRPC transport layer.

mod payment_grpc;

pub use payment_grpc::PaymentGrpcService;
