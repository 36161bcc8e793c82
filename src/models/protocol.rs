//! Ledger wire messages (protobuf). Field tags follow the platform's
//! `transaction.proto` and `batch.proto`.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionHeader {
    #[prost(string, tag = "1")]
    pub batcher_public_key: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "2")]
    pub dependencies: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(string, tag = "3")]
    pub family_name: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub family_version: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "5")]
    pub inputs: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(string, tag = "6")]
    pub nonce: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "7")]
    pub outputs: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(string, tag = "9")]
    pub payload_sha512: ::prost::alloc::string::String,
    #[prost(string, tag = "10")]
    pub signer_public_key: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transaction {
    /// Serialized `TransactionHeader`.
    #[prost(bytes = "vec", tag = "1")]
    pub header: ::prost::alloc::vec::Vec<u8>,
    /// Signature over `header`; doubles as the transaction id.
    #[prost(string, tag = "2")]
    pub header_signature: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "3")]
    pub payload: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchHeader {
    #[prost(string, tag = "1")]
    pub signer_public_key: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "2")]
    pub transaction_ids: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Batch {
    /// Serialized `BatchHeader`.
    #[prost(bytes = "vec", tag = "1")]
    pub header: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag = "2")]
    pub header_signature: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub transactions: ::prost::alloc::vec::Vec<Transaction>,
    #[prost(bool, tag = "4")]
    pub trace: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchList {
    #[prost(message, repeated, tag = "1")]
    pub batches: ::prost::alloc::vec::Vec<Batch>,
}
