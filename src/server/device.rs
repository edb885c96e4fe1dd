// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::frame::SlaveId;
use alloc::vec::Vec;

/// Diagnostic counters and identification of a server device.
pub trait DeviceStatus {
    /// The eight exception status outputs as a bitmap.
    fn exception_status_summary(&self) -> u8;

    /// Number of successfully completed messages.
    fn event_counter(&self) -> u16;

    /// Number of messages seen on the bus.
    fn bus_message_count(&self) -> u16;

    /// Communication events, most recent first.
    fn event_log(&self) -> Vec<u8>;

    /// The server identifier and whether the device is running.
    fn slave_id_summary(&self) -> (SlaveId, bool);

    /// Whether a previous program command is still being processed.
    fn busy(&self) -> bool {
        false
    }
}
