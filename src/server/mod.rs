// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

mod device;
mod store;

pub use self::{device::*, store::*};

use crate::{frame::*, limits};
use alloc::vec::Vec;
use core::ops::RangeInclusive;

type ExecResult = Result<Response, Exception>;

impl Request {
    /// Process the request against a server device.
    ///
    /// All parameters are validated before the store is touched.
    /// Violations are answered with an exception response.
    pub fn execute<C>(&self, ctx: &mut C) -> ResponsePdu
    where
        C: DataStore + DeviceStatus,
    {
        let function = FunctionCode::from(self);
        let rsp = self.process(ctx).map_err(|exception| {
            #[cfg(feature = "log")]
            log::warn!(
                "Responding to request 0x{:0>2X} with exception: {exception}",
                function.value()
            );
            ExceptionResponse {
                function,
                exception,
            }
        });
        ResponsePdu(rsp)
    }

    fn process<C>(&self, ctx: &mut C) -> ExecResult
    where
        C: DataStore + DeviceStatus,
    {
        use crate::frame::Request::*;

        let rsp = match self {
            ReadCoils(address, quantity) => {
                let bits = read_bits(ctx, Table::Coils, *address, *quantity)?;
                Response::ReadCoils(bits)
            }
            ReadDiscreteInputs(address, quantity) => {
                let bits = read_bits(ctx, Table::DiscreteInputs, *address, *quantity)?;
                Response::ReadDiscreteInputs(bits)
            }
            ReadHoldingRegisters(address, quantity) => {
                let words = read_registers(ctx, Table::HoldingRegisters, *address, *quantity)?;
                Response::ReadHoldingRegisters(words)
            }
            ReadInputRegisters(address, quantity) => {
                let words = read_registers(ctx, Table::InputRegisters, *address, *quantity)?;
                Response::ReadInputRegisters(words)
            }
            WriteSingleCoil(address, state) => {
                check_address(ctx, Table::Coils, *address, 1)?;
                write_bits(ctx, *address, &[*state])?;
                Response::WriteSingleCoil(*address, *state)
            }
            WriteSingleRegister(address, word) => {
                check_address(ctx, Table::HoldingRegisters, *address, 1)?;
                write_registers(ctx, *address, &[*word])?;
                Response::WriteSingleRegister(*address, *word)
            }
            WriteMultipleCoils(address, coils) => {
                let quantity = quantity_of(coils.len(), limits::WRITE_COILS)?;
                check_address(ctx, Table::Coils, *address, quantity)?;
                let bits: Vec<_> = coils.iter().collect();
                write_bits(ctx, *address, &bits)?;
                Response::WriteMultipleCoils(*address, quantity)
            }
            WriteMultipleRegisters(address, data) => {
                let quantity = quantity_of(data.len(), limits::WRITE_REGISTERS)?;
                check_address(ctx, Table::HoldingRegisters, *address, quantity)?;
                let words: Vec<_> = data.iter().collect();
                write_registers(ctx, *address, &words)?;
                Response::WriteMultipleRegisters(*address, quantity)
            }
            ReadWriteMultipleRegisters(read_address, read_quantity, write_address, data) => {
                check_quantity(*read_quantity, limits::READ_REGISTERS)?;
                let write_quantity = quantity_of(data.len(), limits::READ_WRITE_REGISTERS)?;
                check_address(ctx, Table::HoldingRegisters, *write_address, write_quantity)?;
                check_address(ctx, Table::HoldingRegisters, *read_address, *read_quantity)?;
                let words: Vec<_> = data.iter().collect();
                write_registers(ctx, *write_address, &words)?;
                let words =
                    ctx.read_registers(Table::HoldingRegisters, *read_address, *read_quantity);
                Response::ReadWriteMultipleRegisters(Data::from_words(&words))
            }
            ReadExceptionStatus => Response::ReadExceptionStatus(ctx.exception_status_summary()),
            GetCommEventCounter => {
                Response::GetCommEventCounter(comm_status(ctx), ctx.event_counter())
            }
            GetCommEventLog => {
                let mut events = ctx.event_log();
                events.truncate(limits::MAX_EVENT_LOG_LEN);
                Response::GetCommEventLog(
                    comm_status(ctx),
                    ctx.event_counter(),
                    ctx.bus_message_count(),
                    events,
                )
            }
            ReportServerId => {
                let (server_id, run_status) = ctx.slave_id_summary();
                Response::ReportServerId(server_id, run_status)
            }
            Custom(_, _) => return Err(Exception::IllegalFunction),
        };
        Ok(rsp)
    }
}

fn comm_status<D: DeviceStatus>(device: &D) -> CommStatus {
    if device.busy() {
        CommStatus::Busy
    } else {
        CommStatus::Ready
    }
}

fn read_bits<S: DataStore>(
    store: &S,
    table: Table,
    address: Address,
    quantity: Quantity,
) -> Result<Coils, Exception> {
    check_quantity(quantity, limits::READ_BITS)?;
    check_address(store, table, address, quantity)?;
    let bits = store.read_bits(table, address, quantity);
    Ok(Coils::from_bools(&bits))
}

fn read_registers<S: DataStore>(
    store: &S,
    table: Table,
    address: Address,
    quantity: Quantity,
) -> Result<Data, Exception> {
    check_quantity(quantity, limits::READ_REGISTERS)?;
    check_address(store, table, address, quantity)?;
    let words = store.read_registers(table, address, quantity);
    Ok(Data::from_words(&words))
}

fn write_bits<S: DataStore>(
    store: &mut S,
    address: Address,
    bits: &[Coil],
) -> Result<(), Exception> {
    store.write_bits(address, bits).inspect_err(|_err| {
        #[cfg(feature = "log")]
        log::warn!("Failed to write {} coil(s) at {address}: {_err}", bits.len());
    })
}

fn write_registers<S: DataStore>(
    store: &mut S,
    address: Address,
    words: &[Word],
) -> Result<(), Exception> {
    store.write_registers(address, words).inspect_err(|_err| {
        #[cfg(feature = "log")]
        log::warn!("Failed to write {} register(s) at {address}: {_err}", words.len());
    })
}

fn check_quantity(quantity: Quantity, range: RangeInclusive<Quantity>) -> Result<(), Exception> {
    if range.contains(&quantity) {
        Ok(())
    } else {
        Err(Exception::IllegalDataValue)
    }
}

/// Quantity of a write request that carries its values.
fn quantity_of(len: usize, range: RangeInclusive<Quantity>) -> Result<Quantity, Exception> {
    let quantity = Quantity::try_from(len).map_err(|_| Exception::IllegalDataValue)?;
    check_quantity(quantity, range)?;
    Ok(quantity)
}

const fn in_address_space(address: Address, quantity: Quantity) -> bool {
    address as u32 + quantity as u32 <= limits::ADDRESS_SPACE
}

fn check_address<S: DataStore>(
    store: &S,
    table: Table,
    address: Address,
    quantity: Quantity,
) -> Result<(), Exception> {
    if in_address_space(address, quantity) && store.validate(table, address, quantity) {
        Ok(())
    } else {
        Err(Exception::IllegalDataAddress)
    }
}
