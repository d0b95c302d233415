//! JavaScript text injected into or generated for the packaged application.

/// Appended to the entry file before packaging.
///
/// In the cluster master it logs every IPv4 address of the host, picks the
/// first external address on a Wi-Fi / Ethernet / USB Ethernet / Bluetooth
/// Ethernet adapter (in that priority) and opens the app on port 8000 in the
/// default browser, falling back to localhost. Relies on the entry file
/// already requiring `cluster` and `os`.
pub const ENTRY_SNIPPET: &str = r#"
if (cluster.isMaster) {
  const { exec } = require('child_process');

  function getWiFiIPv4Address() {
    const networkInterfaces = os.networkInterfaces();
    const adapterPriorities = ['wi-fi', 'ethernet', 'usb ethernet', 'bluetooth ethernet'];

    for (const adapterPriority of adapterPriorities) {
      for (const interfaceName in networkInterfaces) {
        const interfaceInfo = networkInterfaces[interfaceName];
        for (const info of interfaceInfo) {
          if (info.family === 'IPv4') {
            console.log(`server on network "${interfaceName}" http://${info.address}:8000`);

            if (info.internal === false && interfaceName.toLowerCase().includes(adapterPriority)) {
              return info.address;
            }
          }
        }
      }
    }

    return null; // Return null if no suitable adapter is found
  }

  async function executeCommand(command) {
    return new Promise((resolve, reject) => {
      exec(command, (error, stdout, stderr) => {
        if (error) {
          console.error(`Error: ${error.message}`);
          reject(error);
        } else if (stderr) {
          console.error(`stderr: ${stderr}`);
          reject(new Error(stderr));
        } else {
          console.log(`stdout: ${stdout}`);
          resolve(stdout);
        }
      });
    });
  }

  (async () => {
    const IPv4Address = getWiFiIPv4Address();

    if (IPv4Address) {
      try {
        await executeCommand(`start "app" http://${IPv4Address}:8000`);
      } catch (error) {
        console.error('An error occurred:', error);
        await executeCommand('start "app" http://localhost:8000');
      }
    } else {
      console.log('No suitable network adapter found. Starting on localhost...');
      await executeCommand('start "app" http://localhost:8000');
    }
  })();
}
"#;

/// Source of the setup binary. `install_command` is rendered as a JSON
/// string literal.
pub const SETUP_TEMPLATE: &str = r#"const { exec } = require('child_process');

async function executeCommand(command) {
  return new Promise((resolve, reject) => {
    exec(command, (error, stdout, stderr) => {
      if (error) {
        console.error(`Error: ${error.message}`);
        reject(error);
      } else if (stderr) {
        console.error(`stderr: ${stderr}`);
        reject(new Error(stderr));
      } else {
        console.log(`stdout: ${stdout}`);
        resolve(stdout);
      }
    });
  });
}

(async () => {
  await executeCommand({{install_command}});
})();
"#;
