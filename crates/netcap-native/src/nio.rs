//! Portable fallback backend.
//!
//! Needs no native library, so it is always available. Its types are
//! handed out directly rather than looked up through the catalogue.

use std::sync::OnceLock;

use netcap_core::{EventLoopGroup, TransportKind, TypeHandle, TypeKind};

use crate::group::NativeEventLoopGroup;

/// Fallback group: loops carry no native handle.
pub type NioEventLoopGroup = NativeEventLoopGroup<()>;

const NAMESPACE: &str = concat!(env!("CARGO_CRATE_NAME"), "::nio");

/// Handles for every fallback type.
#[derive(Debug, Clone)]
pub struct NioTypes {
    pub server_channel: TypeHandle,
    pub socket_channel: TypeHandle,
    pub datagram_channel: TypeHandle,
    pub event_loop_group: TypeHandle,
    pub event_loop: TypeHandle,
}

/// The fallback types. Built once; every call returns the same handles.
pub fn types() -> &'static NioTypes {
    static TYPES: OnceLock<NioTypes> = OnceLock::new();
    TYPES.get_or_init(|| {
        let name = |simple: &str| format!("{NAMESPACE}::{simple}");
        NioTypes {
            server_channel: TypeHandle::new(name("NioServerSocketChannel"), TypeKind::ServerSocketChannel),
            socket_channel: TypeHandle::new(name("NioSocketChannel"), TypeKind::SocketChannel),
            datagram_channel: TypeHandle::new(name("NioDatagramChannel"), TypeKind::DatagramChannel),
            event_loop_group: TypeHandle::event_loop_group(name("NioEventLoopGroup"), |n, factory| {
                let group = NioEventLoopGroup::open(TransportKind::Nio.name(), n, factory, |_| Ok(()))?;
                Ok(Box::new(group) as Box<dyn EventLoopGroup>)
            }),
            event_loop: TypeHandle::new(name("NioEventLoop"), TypeKind::EventLoop),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcap_core::{DefaultThreadFactory, EventLoopGroupConstructor};
    use std::sync::Arc;

    #[test]
    fn test_types_are_stable() {
        assert!(types().socket_channel.same(&types().socket_channel));
        assert_eq!(types().event_loop.simple_name(), "NioEventLoop");
    }

    #[test]
    fn test_group_constructor() {
        let ctor = EventLoopGroupConstructor::bind("NIO", &types().event_loop_group).unwrap();
        let group = ctor
            .construct(4, Arc::new(DefaultThreadFactory::new("nio")))
            .unwrap();
        assert_eq!(group.thread_count(), 4);
        assert_eq!(group.transport(), "NIO");
    }
}
