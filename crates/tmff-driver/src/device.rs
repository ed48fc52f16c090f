//! Per-device lifecycle controller.

use std::sync::Arc;

use openracing_usb_transport::{SetupSequencer, TransferRequest, TransportAdapter, UsbTransport};
use racing_wheel_hid_tmff_protocol::{
    ControlHandshake, EffectDescriptor, EffectDispatcher, EffectKind, FieldBinding, ModePair,
    ModelProfile, OutputReport, PlayOutcome, ReportWriter, build_autocenter_commands,
    build_gain_command, build_range_command,
};
use tracing::{debug, error, info, warn};

use crate::config::DriverConfig;
use crate::error::{DriverError, DriverResult, ErrorCategory};
use crate::hooks::InputHooks;
use crate::state::LifecycleState;

/// One attached device: its capability record, transport and FF state.
///
/// Calls into a handle must be serialized by the caller; a handle never
/// shares state with another.
pub struct DeviceHandle {
    profile: ModelProfile,
    config: DriverConfig,
    adapter: TransportAdapter,
    writer: Box<dyn ReportWriter + Send>,
    hooks: Box<dyn InputHooks + Send>,
    state: LifecycleState,
    binding: Option<FieldBinding>,
    dispatcher: EffectDispatcher,
    send_buffer: Vec<u8>,
    range_degrees: Option<u16>,
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("model", &self.profile.name)
            .field("state", &self.state)
            .field("binding", &self.binding)
            .field("range_degrees", &self.range_degrees)
            .finish_non_exhaustive()
    }
}

impl DeviceHandle {
    /// Create the handle for a newly attached device. No traffic is sent.
    pub fn attach(
        profile: ModelProfile,
        config: DriverConfig,
        transport: Arc<dyn UsbTransport>,
        writer: Box<dyn ReportWriter + Send>,
        hooks: Box<dyn InputHooks + Send>,
    ) -> Self {
        debug!(product_id = profile.product_id, name = %profile.name, "device attached");
        let dispatcher = EffectDispatcher::new(profile.motor_swap);
        Self {
            profile,
            config,
            adapter: TransportAdapter::new(transport),
            writer,
            hooks,
            state: LifecycleState::Uninitialized,
            binding: None,
            dispatcher,
            send_buffer: Vec::new(),
            range_degrees: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn profile(&self) -> &ModelProfile {
        &self.profile
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn binding(&self) -> Option<&FieldBinding> {
        self.binding.as_ref()
    }

    /// Last rotation range successfully sent, in degrees.
    pub fn range_degrees(&self) -> Option<u16> {
        self.range_degrees
    }

    /// Effect kinds to advertise to the input layer.
    pub fn supported_effects(&self) -> &[EffectKind] {
        &self.profile.effects
    }

    /// Effect slots to allocate in the input layer.
    pub fn max_effects(&self) -> usize {
        self.profile.max_effects
    }

    /// Bring the device up.
    ///
    /// Binds the FF field, replays the model's setup packets, then runs the
    /// optional control handshake. A handshake failure is logged and
    /// ignored. With `open_mode` off the mode-enter pair is sent last.
    ///
    /// # Errors
    ///
    /// - [`DriverError::Protocol`] if no usable FF field exists; the device is destroyed.
    /// - [`DriverError::Setup`] if a setup packet fails; the device is destroyed
    ///   unless the failure was resource exhaustion, which leaves it
    ///   uninitialized so init can be retried.
    /// - [`DriverError::InvalidState`] unless the device is uninitialized.
    pub fn init(&mut self, reports: &[OutputReport]) -> DriverResult<()> {
        if !self.state.can_init() {
            return Err(DriverError::invalid_state(self.state, "init"));
        }
        self.state = LifecycleState::SetupInProgress;

        match self.bring_up(reports) {
            Ok(()) => {
                self.state = LifecycleState::Ready;
                info!("initialized force feedback for {}", self.profile.name);
                Ok(())
            }
            Err(err) => {
                error!(%err, "failed initializing force feedback for {}", self.profile.name);
                self.release();
                if err.category() == ErrorCategory::ResourceExhaustion {
                    self.state = LifecycleState::Uninitialized;
                }
                Err(err)
            }
        }
    }

    fn bring_up(&mut self, reports: &[OutputReport]) -> DriverResult<()> {
        // A device without an FF field gets no setup traffic at all.
        self.binding = self.profile.binding.bind(reports)?;

        if self.profile.send_buffer_len > 0 {
            self.send_buffer = TransportAdapter::allocate(self.profile.send_buffer_len)?;
        }

        if !self.profile.setup.is_empty() {
            let endpoint = self.adapter.interrupt_out_endpoint()?;
            let sequencer =
                SetupSequencer::new(&self.adapter, endpoint, self.config.transfer_timeout());
            let sent = sequencer.run(self.profile.setup.packets())?;
            debug!(sent, "setup sequence complete");
        }

        if let Some(handshake) = self.profile.handshake {
            if let Err(err) = self.handshake(handshake) {
                warn!(%err, "control handshake failed, continuing");
            }
        }

        if !self.config.open_mode {
            if let Some(mode_switch) = self.profile.mode_switch {
                if let Err(err) = self.send_mode_pair(mode_switch.enter) {
                    warn!(%err, "mode enter at init failed");
                }
            }
        }
        Ok(())
    }

    /// Play one effect through the bound field.
    ///
    /// Models without an FF field, models whose field carries a vendor
    /// command stream, and effect kinds other than constant and rumble,
    /// return [`PlayOutcome::Ignored`].
    ///
    /// # Errors
    ///
    /// [`DriverError::ReportWrite`] if the host failed to send the report;
    /// the lifecycle state is unchanged.
    pub fn play(&mut self, effect: &EffectDescriptor) -> DriverResult<PlayOutcome> {
        if !self.state.can_play() {
            return Err(DriverError::invalid_state(self.state, "play"));
        }
        let Some(binding) = self.binding.as_mut() else {
            debug!(kind = ?effect.kind(), "no FF field bound, effect ignored");
            return Ok(PlayOutcome::Ignored);
        };
        if self.profile.command_stream {
            debug!(kind = ?effect.kind(), "FF field carries vendor commands, effect ignored");
            return Ok(PlayOutcome::Ignored);
        }
        let outcome = self.dispatcher.play(binding, effect, self.writer.as_mut())?;
        Ok(outcome)
    }

    /// Open the input device, entering active mode first when asked.
    ///
    /// The mode-enter pair is sent only when `active` is set and
    /// [`DriverConfig::open_mode`] is on. With `open_mode` off the pair was
    /// already sent by [`init`](Self::init), so `open(true)` only calls the
    /// input hook.
    ///
    /// # Errors
    ///
    /// A transport error from the mode packets or the hook's own error; the
    /// state does not change.
    pub fn open(&mut self, active: bool) -> DriverResult<()> {
        if !self.state.can_open() {
            return Err(DriverError::invalid_state(self.state, "open"));
        }
        if active && self.config.open_mode {
            if let Some(mode_switch) = self.profile.mode_switch {
                self.send_mode_pair(mode_switch.enter)?;
            }
        }
        self.hooks.open()?;
        self.state = LifecycleState::Open;
        Ok(())
    }

    /// Leave active mode when asked, then close the input device.
    ///
    /// Like [`open`](Self::open), the mode-exit pair needs both `active` and
    /// [`DriverConfig::open_mode`]; otherwise only the input hook runs.
    ///
    /// # Errors
    ///
    /// A transport error from the mode packets; the hook is not called and
    /// the state does not change.
    pub fn close(&mut self, active: bool) -> DriverResult<()> {
        if !self.state.can_close() {
            return Err(DriverError::invalid_state(self.state, "close"));
        }
        if active && self.config.open_mode {
            if let Some(mode_switch) = self.profile.mode_switch {
                self.send_mode_pair(mode_switch.exit)?;
            }
        }
        self.hooks.close();
        self.state = LifecycleState::Closed;
        Ok(())
    }

    /// Set the rotation range, clamped to the model bounds.
    ///
    /// Returns the range actually sent.
    ///
    /// # Errors
    ///
    /// [`DriverError::FeatureNotSupported`] for models without range
    /// bounds, or the transport error from sending the command.
    pub fn set_range(&mut self, degrees: u16) -> DriverResult<u16> {
        if !self.state.can_command() {
            return Err(DriverError::invalid_state(self.state, "set_range"));
        }
        let bounds = self.profile.range.ok_or_else(|| DriverError::FeatureNotSupported {
            model: self.profile.name.clone(),
            feature: "range",
        })?;
        let (clamped, changed) = bounds.clamp(degrees);
        if changed {
            info!("value {degrees} out of range, clamping to {clamped}");
        }
        self.send_command(&build_range_command(clamped))?;
        self.range_degrees = Some(clamped);
        Ok(clamped)
    }

    /// # Errors
    ///
    /// [`DriverError::FeatureNotSupported`] unless the model advertises gain.
    pub fn set_gain(&mut self, gain: u16) -> DriverResult<()> {
        self.require_command(EffectKind::Gain, "set_gain")?;
        self.send_command(&build_gain_command(gain))
    }

    /// # Errors
    ///
    /// [`DriverError::FeatureNotSupported`] unless the model advertises autocenter.
    pub fn set_autocenter(&mut self, level: u16) -> DriverResult<()> {
        self.require_command(EffectKind::Autocenter, "set_autocenter")?;
        for command in build_autocenter_commands(level) {
            self.send_command(&command)?;
        }
        Ok(())
    }

    /// Tear the device down. No traffic is sent.
    ///
    /// # Errors
    ///
    /// [`DriverError::InvalidState`] if init already destroyed the device;
    /// its resources are released either way.
    pub fn destroy(mut self) -> DriverResult<()> {
        if self.state.is_destroyed() {
            return Err(DriverError::invalid_state(self.state, "destroy"));
        }
        self.release();
        debug!(name = %self.profile.name, "device destroyed");
        Ok(())
    }

    fn require_command(&self, kind: EffectKind, operation: &'static str) -> DriverResult<()> {
        if !self.state.can_command() {
            return Err(DriverError::invalid_state(self.state, operation));
        }
        if !self.profile.supports(kind) {
            return Err(DriverError::FeatureNotSupported {
                model: self.profile.name.clone(),
                feature: operation,
            });
        }
        Ok(())
    }

    fn handshake(&self, handshake: ControlHandshake) -> DriverResult<()> {
        let mut buffer = TransportAdapter::allocate(handshake.response.len())?;
        buffer.copy_from_slice(&handshake.response);
        let request = TransferRequest::control_out(
            handshake.request,
            buffer,
            handshake.data_len,
            self.config.control_timeout(),
        );
        self.adapter.transfer(request)?;
        Ok(())
    }

    fn send_mode_pair(&mut self, pair: ModePair) -> DriverResult<()> {
        for step in pair.steps() {
            self.send_command(&step)?;
        }
        Ok(())
    }

    /// Send `command` at the start of the zero-filled send buffer.
    fn send_command(&mut self, command: &[u8]) -> DriverResult<()> {
        let endpoint = self.adapter.interrupt_out_endpoint()?;
        let len = self.profile.send_buffer_len.max(command.len());

        let mut buffer = std::mem::take(&mut self.send_buffer);
        if buffer.len() != len {
            buffer = TransportAdapter::allocate(len)?;
        }
        buffer.fill(0);
        if let Some(prefix) = buffer.get_mut(..command.len()) {
            prefix.copy_from_slice(command);
        }

        let timeout = self.config.transfer_timeout();
        let outcome = self
            .adapter
            .transfer(TransferRequest::interrupt_out(endpoint, buffer, timeout))
            .inspect_err(|err| debug!(%err, ?command, "vendor command failed"))?;
        self.send_buffer = outcome.buffer;
        Ok(())
    }

    fn release(&mut self) {
        self.binding = None;
        self.send_buffer = Vec::new();
        self.range_degrees = None;
        self.state = LifecycleState::Destroyed;
    }
}
